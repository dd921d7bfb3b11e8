use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::*;

/// Mines around an opened safe tile, always 1 to 8.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MineCount(u8);

impl MineCount {
    pub const fn new(count: u8) -> Option<Self> {
        match count {
            1..=8 => Some(Self(count)),
            _ => None,
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// What a client may see of a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileSymbol {
    /// Unflagged mine, only shown after a loss.
    Mine,
    /// Flag on a safe tile, only shown after a loss.
    IncorrectFlag,
    /// Player flag, or any mine once the game is won.
    Flag,
    Hidden,
    /// Opened with no adjacent mines.
    Empty,
    /// Opened with adjacent mines.
    Number(MineCount),
}

impl TileSymbol {
    /// Disclosure rules, checked top to bottom.
    pub fn for_tile(tile: Tile, outcome: Outcome) -> Self {
        let lost = outcome == Outcome::Lost;
        let won = outcome == Outcome::Won;

        if lost && tile.is_mine() && !tile.is_flagged() {
            Self::Mine
        } else if lost && !tile.is_mine() && tile.is_flagged() {
            Self::IncorrectFlag
        } else if tile.is_flagged() || (won && tile.is_mine()) {
            Self::Flag
        } else if !tile.is_revealed() {
            Self::Hidden
        } else {
            match MineCount::new(tile.adjacency()) {
                Some(count) => Self::Number(count),
                None if tile.is_mine() => Self::Mine,
                None => Self::Empty,
            }
        }
    }

    /// Wire form understood by clients.
    pub const fn as_str(self) -> &'static str {
        const NUMBERS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];
        match self {
            Self::Mine => "9",
            Self::IncorrectFlag => "X",
            Self::Flag => "!",
            Self::Hidden => "?",
            Self::Empty => "",
            Self::Number(count) => NUMBERS[count.get() as usize - 1],
        }
    }
}

impl fmt::Display for TileSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TileSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Snapshot of a board as clients see it. Field order is the wire order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub flags: CellCount,
    pub grid: Vec<TileSymbol>,
    pub height: Coord,
    pub mines: CellCount,
    pub started_at: DateTime<Utc>,
    pub width: Coord,
    #[serde(skip_serializing_if = "core::ops::Not::not")]
    pub won: bool,
}

impl BoardView {
    pub fn outcome(&self) -> Outcome {
        match (self.ended_at, self.won) {
            (_, true) => Outcome::Won,
            (Some(_), false) => Outcome::Lost,
            (None, false) => Outcome::InProgress,
        }
    }

    pub fn symbol_at(&self, (x, y): Coord2) -> Option<TileSymbol> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.grid
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))
            .copied()
    }
}

impl Board {
    /// Renders the board for clients. After a win every mine counts as flagged.
    pub fn render_view(&self) -> BoardView {
        let outcome = self.outcome();
        let (width, height) = self.size();
        BoardView {
            ended_at: self.ended_at(),
            flags: if outcome == Outcome::Won {
                self.total_mines()
            } else {
                self.flag_count()
            },
            grid: self
                .tiles()
                .map(|tile| TileSymbol::for_tile(tile, outcome))
                .collect(),
            height,
            mines: self.total_mines(),
            started_at: self.started_at(),
            width,
            won: outcome == Outcome::Won,
        }
    }
}
