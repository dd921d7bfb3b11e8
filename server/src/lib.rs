//! Serves minesweeper games over HTTP, backed by an in-memory [`store::GameStore`].

pub mod api;
pub mod config;
pub mod store;

pub use api::router;
pub use config::{Args, ServerConfig};
pub use store::GameStore;
