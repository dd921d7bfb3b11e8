//! In-memory registry of running games.
//!
//! The map itself sits behind a read/write lock that is only held long enough to find, add or drop a game. Each
//! game has its own mutex, so moves on one board never wait on another board's cascade.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mines_core::{Board, BoardId, BoardView, Coord, GameError};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid game")]
    GameNotFound,
    #[error("invalid turn")]
    TurnNotFound,
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = core::result::Result<T, StoreError>;

/// One accepted move and the board as it looked right after it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Turn {
    pub turn: usize,
    pub x: Coord,
    pub y: Coord,
    pub flag: bool,
    pub taken_at: DateTime<Utc>,
    pub board: BoardView,
}

#[derive(Debug)]
struct Game {
    board: Board,
    history: Vec<Turn>,
}

#[derive(Debug, Default)]
pub struct GameStore {
    games: RwLock<HashMap<BoardId, Arc<Mutex<Game>>>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board with random mines and registers it.
    pub async fn create(&self, width: usize, height: usize, mines: usize) -> Result<BoardId> {
        let board = Board::create(width, height, mines)?;
        Ok(self.insert(board).await)
    }

    /// Registers an already built board under its own id.
    pub async fn insert(&self, board: Board) -> BoardId {
        let id = board.id();
        let game = Game {
            board,
            history: Vec::new(),
        };
        self.games.write().await.insert(id, Arc::new(Mutex::new(game)));
        id
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }

    pub async fn contains(&self, id: BoardId) -> bool {
        self.games.read().await.contains_key(&id)
    }

    /// Plays a move and returns the board as it looks afterwards. Coordinates past the largest possible board are
    /// out of bounds like any other.
    pub async fn apply_move(&self, id: BoardId, x: u16, y: u16, flag: bool) -> Result<BoardView> {
        let (Ok(x), Ok(y)) = (Coord::try_from(x), Coord::try_from(y)) else {
            return Err(GameError::OutOfBounds.into());
        };

        let game = self.get(id).await?;
        let mut game = game.lock().await;
        if let Err(err) = game.board.apply_move(x, y, flag) {
            log::debug!("Game {} rejected move ({}, {}, flag: {}): {}", id, x, y, flag, err);
            return Err(err.into());
        }

        let view = game.board.render_view();
        let turn = game.history.len();
        game.history.push(Turn {
            turn,
            x,
            y,
            flag,
            taken_at: Utc::now(),
            board: view.clone(),
        });
        if game.board.is_finished() {
            log::info!("Game {} ended as {:?} after {} turns", id, game.board.outcome(), turn + 1);
        }
        Ok(view)
    }

    pub async fn view(&self, id: BoardId) -> Result<BoardView> {
        let game = self.get(id).await?;
        let game = game.lock().await;
        Ok(game.board.render_view())
    }

    pub async fn turn(&self, id: BoardId, turn: usize) -> Result<Turn> {
        let game = self.get(id).await?;
        let game = game.lock().await;
        game.history.get(turn).cloned().ok_or(StoreError::TurnNotFound)
    }

    pub async fn turn_count(&self, id: BoardId) -> Result<usize> {
        let game = self.get(id).await?;
        let game = game.lock().await;
        Ok(game.history.len())
    }

    /// Administrative end with the given outcome, whatever state the game is in.
    pub async fn force_end(&self, id: BoardId, won: bool) -> Result<()> {
        let game = self.get(id).await?;
        game.lock().await.board.force_end(won);
        log::info!("Game {} force ended (won: {})", id, won);
        Ok(())
    }

    /// Ends a game the player walked away from as a loss. Finished games keep their outcome.
    pub async fn abandon(&self, id: BoardId) -> Result<()> {
        let game = self.get(id).await?;
        let mut game = game.lock().await;
        if game.board.is_finished() {
            log::debug!("Game {} already ended as {:?}", id, game.board.outcome());
            return Ok(());
        }
        game.board.force_end(false);
        log::info!("Game {} abandoned", id);
        Ok(())
    }

    pub async fn remove(&self, id: BoardId) -> Result<()> {
        self.games
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::GameNotFound)
    }

    async fn get(&self, id: BoardId) -> Result<Arc<Mutex<Game>>> {
        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::GameNotFound)
    }
}
