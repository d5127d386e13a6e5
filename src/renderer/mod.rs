//! Terminal rendering module
//!
//! Scales the play area onto the terminal grid and draws every box as
//! colored cells. Only cells that changed since the last frame are written.

pub mod grid;
pub mod terminal;

pub use grid::{Cell, Grid, compose};
pub use terminal::TerminalRenderer;
