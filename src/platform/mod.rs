//! Platform abstraction layer
//!
//! Handles terminal specifics for:
//! - Key events → simulation commands and held directions
//! - Frame pacing

pub mod input;
pub mod pacer;

pub use input::{InputCollector, map_command};
pub use pacer::FramePacer;
