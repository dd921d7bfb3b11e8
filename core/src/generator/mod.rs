use core::fmt;

use crate::*;
pub use random::*;

mod random;

/// Decides where the mines go once the first move is known.
pub trait MineGenerator: fmt::Debug + Send {
    /// Builds a layout for `config`. `safe` is the first tile the player touched and should stay free of mines.
    fn generate(&self, config: &BoardConfig, safe: Coord2) -> MineLayout;

    /// Checked once when a board is built, before any move can reach [`MineGenerator::generate`].
    fn check(&self, _config: &BoardConfig) -> Result<()> {
        Ok(())
    }
}

/// A fixed layout places exactly the mines it holds, whatever the first move was.
impl MineGenerator for MineLayout {
    fn generate(&self, _config: &BoardConfig, safe: Coord2) -> MineLayout {
        if self.contains_mine(safe) {
            log::warn!("Fixed layout has a mine under the first move at {:?}", safe);
        }
        self.clone()
    }

    fn check(&self, config: &BoardConfig) -> Result<()> {
        if self.size() != config.size || self.mine_count() != config.mines {
            log::debug!(
                "Fixed layout is {:?} with {} mines, the board is {:?} with {}",
                self.size(),
                self.mine_count(),
                config.size,
                config.mines
            );
            return Err(GameError::InvalidBoardShape);
        }
        Ok(())
    }
}
