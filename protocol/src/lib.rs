//! Request forms and response bodies of the games HTTP API.
//!
//! Board views themselves are serialized by `mines-core`; this crate covers everything around them.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WIDTH: u16 = 12;
pub const DEFAULT_HEIGHT: u16 = 12;
pub const DEFAULT_MINES: u16 = 20;

/// Value of the `flag` field that switches a move to flag toggling.
pub const FLAG_ON: &str = "1";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} cannot be empty")]
    Missing(&'static str),
    #[error("invalid {field}: {source}")]
    InvalidNumber {
        field: &'static str,
        source: ParseIntError,
    },
}

/// Fields posted to create a game: `w`, `h` and `m`. Each falls back to its default when missing or not a `u16`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameForm {
    #[serde(default)]
    pub w: Option<String>,
    #[serde(default)]
    pub h: Option<String>,
    #[serde(default)]
    pub m: Option<String>,
}

impl CreateGameForm {
    /// Fills the fields missing here from `query`, body values come first.
    pub fn or_query(self, query: Self) -> Self {
        Self {
            w: self.w.or(query.w),
            h: self.h.or(query.h),
            m: self.m.or(query.m),
        }
    }

    pub fn width(&self) -> u16 {
        parse_or(self.w.as_deref(), DEFAULT_WIDTH)
    }

    pub fn height(&self) -> u16 {
        parse_or(self.h.as_deref(), DEFAULT_HEIGHT)
    }

    pub fn mines(&self) -> u16 {
        parse_or(self.m.as_deref(), DEFAULT_MINES)
    }
}

fn parse_or(value: Option<&str>, default: u16) -> u16 {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Fields posted to play a move: `x` and `y` are required, `flag=1` toggles a flag instead of revealing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveForm {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub x: u16,
    pub y: u16,
    pub flag: bool,
}

impl MoveForm {
    /// Fills the fields missing here from `query`, body values come first.
    pub fn or_query(self, query: Self) -> Self {
        Self {
            x: self.x.or(query.x),
            y: self.y.or(query.y),
            flag: self.flag.or(query.flag),
        }
    }

    pub fn parse(&self) -> Result<MoveRequest, FormError> {
        Ok(MoveRequest {
            x: required(self.x.as_deref(), "x")?,
            y: required(self.y.as_deref(), "y")?,
            flag: self.flag.as_deref() == Some(FLAG_ON),
        })
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<u16, FormError> {
    match value {
        None | Some("") => Err(FormError::Missing(field)),
        Some(s) => s
            .parse()
            .map_err(|source| FormError::InvalidNumber { field, source }),
    }
}

/// Body of a successful game creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub uuid: String,
}

/// Body of the game listing, only the number of live games is disclosed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCount {
    pub games: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
