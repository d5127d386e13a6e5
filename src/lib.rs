//! Fruit Catcher - A falling-fruit arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `assets`: Visual lookup with solid-color fallbacks
//! - `tuning`: Data-driven game balance
//! - `platform`: Terminal input mapping and frame pacing
//! - `renderer`: Terminal rendering of the scene

pub mod assets;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{GameError, TuningError};
pub use tuning::Tuning;

use glam::IVec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Target frame rate of the frame loop
    pub const FPS: u32 = 60;

    /// Play area dimensions
    pub const PLAY_WIDTH: i32 = 800;
    pub const PLAY_HEIGHT: i32 = 600;

    /// Spawn cadence (milliseconds)
    pub const SPAWN_DELAY_START_MS: u32 = 2000;
    pub const SPAWN_DELAY_STEP_MS: u32 = 20;
    pub const SPAWN_DELAY_FLOOR_MS: u32 = 500;

    /// Spawn weights
    pub const BOMB_CHANCE: f64 = 0.4;
    pub const HEART_CHANCE: f64 = 0.1;

    /// Spawn band: top edge between 100 and 40 units above the play area
    pub const SPAWN_Y_MIN: i32 = -100;
    pub const SPAWN_Y_MAX: i32 = -40;

    /// Falling speed range in units/frame (upper bound exclusive)
    pub const FALL_SPEED_MIN: i32 = 3;
    pub const FALL_SPEED_MAX: i32 = 8;

    /// Player paddle
    pub const PLAYER_WIDTH: i32 = 80;
    pub const PLAYER_HEIGHT: i32 = 30;
    pub const PLAYER_SPEED: i32 = 7;
    pub const PLAYER_BOTTOM_MARGIN: i32 = 10;

    /// Sprite sizes (16x16 tiles scaled 2x) and fallback placeholder size
    pub const SPRITE_SIZE: i32 = 32;
    pub const FALLBACK_SIZE: i32 = 30;

    /// Explosion animation
    pub const EXPLOSION_FRAME_HOLD: u32 = 4;
    pub const EXPLOSION_FRAME_COUNT: usize = 8;
    pub const EXPLOSION_SIZE: i32 = 48;

    /// Scoring
    pub const FRUIT_POINTS: u64 = 10;
    pub const COMBO_THRESHOLD: u32 = 3;
    pub const COMBO_STEP_POINTS: u64 = 20;

    /// Lives
    pub const START_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;

    /// Number of distinct fruit kinds (5x2 grid plus 3 extra)
    pub const FRUIT_KIND_COUNT: u8 = 13;
}

/// Axis-aligned box overlap (strict, touching edges do not overlap)
#[inline]
pub fn boxes_overlap(a_pos: IVec2, a_size: IVec2, b_pos: IVec2, b_size: IVec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && b_pos.x < a_pos.x + a_size.x
        && a_pos.y < b_pos.y + b_size.y
        && b_pos.y < a_pos.y + a_size.y
}

/// Center point of a box given its top-left corner and size
#[inline]
pub fn box_center(pos: IVec2, size: IVec2) -> IVec2 {
    pos + size / 2
}
