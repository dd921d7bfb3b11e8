use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("width exceeds max")]
    WidthExceedsMax,
    #[error("height exceeds max")]
    HeightExceedsMax,
    #[error("board needs at least one tile")]
    EmptyBoard,
    #[error("mines exceed tiles")]
    TooManyMines,
    #[error("mine layout does not match the board")]
    InvalidBoardShape,
    #[error("coordinates are outside the board")]
    OutOfBounds,
    #[error("Game is not active")]
    GameNotActive,
}

impl GameError {
    /// Errors raised while building a board, as opposed to errors raised by a move.
    pub const fn is_validation(self) -> bool {
        matches!(
            self,
            Self::WidthExceedsMax
                | Self::HeightExceedsMax
                | Self::EmptyBoard
                | Self::TooManyMines
                | Self::InvalidBoardShape
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
