use serde::{Deserialize, Serialize};

/// Adjacency value reserved for a tile that holds a mine.
pub const MINE: u8 = 9;

/// One cell of the board as the engine stores it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    adjacency: u8,
    flagged: bool,
    revealed: bool,
}

impl Tile {
    pub(crate) const fn with_adjacency(adjacency: u8) -> Self {
        Self {
            adjacency,
            flagged: false,
            revealed: false,
        }
    }

    /// Mines around this tile, or [`MINE`] if the tile itself is one.
    pub const fn adjacency(self) -> u8 {
        self.adjacency
    }

    pub const fn is_mine(self) -> bool {
        self.adjacency == MINE
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    /// Hidden and unflagged, the only state a cascade or chord may open.
    pub const fn is_openable(self) -> bool {
        !self.revealed && !self.flagged
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }
}
