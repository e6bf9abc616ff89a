//! Error types for the solver.
//!
//! Every variant is a caller-contract violation: a malformed move string, a
//! drop into a full column, or a search request on a finished game.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Move string token that is not a column number in 1..=7
    #[error("Invalid column token {token:?} at position {index}")]
    InvalidColumnToken { token: char, index: usize },

    /// 0-based column index past the right edge
    #[error("Column index {column} out of range (must be 0-6)")]
    ColumnOutOfRange { column: usize },

    /// Drop into a column whose top cell is occupied
    #[error("Column {} is full", .column + 1)]
    ColumnFull { column: usize },

    /// Search requested on a won, lost or full position
    #[error("Cannot search a terminal position")]
    TerminalPosition,
}

pub type SolverResult<T> = Result<T, SolverError>;
