//! Knowledge-based minesweeper player.
//!
//! A [`MineField`] holds the hidden layout; a [`KnowledgeBase`] turns the
//! clues revealed on it into [`Sentence`]s ("exactly N of these cells are
//! mines") and resolves them against each other to find cells that are
//! certainly safe or certainly mined.
use std::fmt;

mod config;
mod field;
mod infer;
mod internal_util;
pub mod logging;
pub mod play;
pub mod util;

pub use config::GameConfig;
pub use field::{FieldError, MineField};
pub use infer::{InconsistencyError, KnowledgeBase, Sentence};

/// A `(row, column)` position on the grid
pub type Cell = (usize, usize);

/// Any error raised while building a game or reasoning about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad dimensions, or a cell outside the field.
    Field(FieldError),
    /// The clues contradict each other.
    Inconsistent(InconsistencyError),
}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        Error::Field(err)
    }
}

impl From<InconsistencyError> for Error {
    fn from(err: InconsistencyError) -> Self {
        Error::Inconsistent(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Field(e) => write!(f, "{}", e),
            Error::Inconsistent(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Field(e) => Some(e),
            Error::Inconsistent(e) => Some(e),
        }
    }
}
