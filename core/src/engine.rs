use core::fmt;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::*;

/// Opaque identity of a board, used by callers to route requests to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(Uuid);

impl BoardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Anything else only happens through [`Board::force_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A single game, from creation to its terminal state.
#[derive(Debug)]
pub struct Board {
    id: BoardId,
    config: BoardConfig,
    tiles: Array2<Tile>,
    generator: Option<Box<dyn MineGenerator>>,
    flag_count: CellCount,
    outcome: Outcome,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Board {
    /// New board with randomly placed mines.
    pub fn create(width: usize, height: usize, mines: usize) -> Result<Self> {
        Self::with_generator(
            BoardConfig::new(width, height, mines)?,
            RandomMineGenerator::from_entropy(),
        )
    }

    /// New board whose mine placement is reproducible from `seed`.
    pub fn with_seed(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomMineGenerator::new(seed))
    }

    /// Fails when `config` breaks the board limits or the generator cannot serve it.
    pub fn with_generator(config: BoardConfig, generator: impl MineGenerator + 'static) -> Result<Self> {
        let config = BoardConfig::new(config.width().into(), config.height().into(), config.mines.into())?;
        generator.check(&config)?;
        Ok(Self {
            id: BoardId::new(),
            config,
            tiles: Array2::default(grid_shape(config.size)),
            generator: Some(Box::new(generator)),
            flag_count: 0,
            outcome: Outcome::InProgress,
            started_at: Utc::now(),
            ended_at: None,
        })
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn mines_placed(&self) -> bool {
        self.generator.is_none()
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        self.config
            .contains(coords)
            .then(|| self.tiles[coords.to_nd_index()])
    }

    /// Tiles in row-major order, index `y * width + x`.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.iter().copied()
    }

    /// Flags or unflags a hidden tile when `toggle_flag` is set, otherwise reveals it (or chords an already revealed
    /// number). Redundant actions are accepted and change nothing; errors are only returned before anything changed.
    pub fn apply_move(&mut self, x: Coord, y: Coord, toggle_flag: bool) -> Result<()> {
        let coords = (x, y);
        if !self.config.contains(coords) {
            return Err(GameError::OutOfBounds);
        }
        if self.outcome.is_finished() {
            return Err(GameError::GameNotActive);
        }
        self.place_mines(coords);

        let tile = self.tiles[coords.to_nd_index()];
        match (tile.is_revealed(), tile.is_flagged(), toggle_flag) {
            (true, _, false) => self.chord(coords),
            (true, _, true) => {}
            (false, false, true) => {
                self.tiles[coords.to_nd_index()].set_flagged(true);
                self.flag_count += 1;
            }
            (false, false, false) => self.reveal(coords),
            (false, true, true) => {
                self.tiles[coords.to_nd_index()].set_flagged(false);
                self.flag_count -= 1;
            }
            (false, true, false) => {}
        }

        if !self.outcome.is_finished() && self.all_safe_tiles_revealed() {
            self.finish(Outcome::Won);
        }
        Ok(())
    }

    /// Ends the game regardless of its state. An end time already recorded is kept.
    pub fn force_end(&mut self, won: bool) {
        let outcome = if won { Outcome::Won } else { Outcome::Lost };
        log::debug!("Board {} force ended as {:?}", self.id, outcome);
        self.outcome = outcome;
        self.ended_at.get_or_insert_with(Utc::now);
    }

    fn place_mines(&mut self, safe: Coord2) {
        let Some(generator) = self.generator.take() else {
            return;
        };

        let layout = generator.generate(&self.config, safe);
        let (width, height) = self.config.size;
        for y in 0..height {
            for x in 0..width {
                let adjacency = if layout.contains_mine((x, y)) {
                    MINE
                } else {
                    layout.adjacent_mine_count((x, y))
                };
                self.tiles[(x, y).to_nd_index()] = Tile::with_adjacency(adjacency);
            }
        }
        log::debug!(
            "Board {} placed {} mines, first move at {:?}",
            self.id,
            layout.mine_count(),
            safe
        );
    }

    /// Opens every hidden neighbor of a revealed number whose flagged neighbors match it exactly.
    fn chord(&mut self, coords: Coord2) {
        let adjacency = self.tiles[coords.to_nd_index()].adjacency();
        let flagged = self
            .neighbors(coords)
            .filter(|&pos| self.tiles[pos.to_nd_index()].is_flagged())
            .count();
        if flagged != usize::from(adjacency) {
            return;
        }

        for pos in self.neighbors(coords) {
            if self.outcome.is_finished() {
                break;
            }
            if self.tiles[pos.to_nd_index()].is_openable() {
                self.reveal(pos);
            }
        }
    }

    /// Reveals a hidden tile and flood fills from it while revealed tiles have no adjacent mines. The tiles' own
    /// revealed flag keeps the fill from visiting a tile twice.
    fn reveal(&mut self, coords: Coord2) {
        let mut pending = vec![coords];

        while let Some(pos) = pending.pop() {
            let tile = self.tiles[pos.to_nd_index()];
            if !tile.is_openable() {
                continue;
            }
            self.tiles[pos.to_nd_index()].reveal();

            if tile.is_mine() {
                log::debug!("Board {} hit a mine at {:?}", self.id, pos);
                self.finish(Outcome::Lost);
                return;
            }

            if tile.adjacency() == 0 {
                log::trace!("Flood fill continues from {:?}", pos);
                let size = self.config.size;
                pending.extend(
                    Neighbors::new(pos, size).filter(|&next| self.tiles[next.to_nd_index()].is_openable()),
                );
            }
        }
    }

    fn all_safe_tiles_revealed(&self) -> bool {
        let settled = self
            .tiles
            .iter()
            .filter(|tile| tile.is_revealed() || tile.is_mine())
            .count();
        settled == usize::from(self.config.total_cells())
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_finished() {
            return;
        }
        self.outcome = outcome;
        self.ended_at = Some(Utc::now());
    }

    fn neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.config.size)
    }
}
