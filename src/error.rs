//! Error types
//!
//! The simulation itself has no error paths; these cover the edges of the
//! program (configuration loading and terminal I/O).

use std::io;

/// Top-level error returned by the binary
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Tuning error: {0}")]
    Tuning(#[from] TuningError),
}

/// Failure to load or validate a tuning file
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    Invalid(String),
}
