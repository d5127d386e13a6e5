//! Game balance values
//!
//! Defaults come from [`crate::consts`]. A JSON file can override any subset
//! of fields; missing fields keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Half-open integer range `[min, max)` used for random draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanI32 {
    pub min: i32,
    pub max: i32,
}

impl SpanI32 {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub play_width: i32,
    pub play_height: i32,
    /// Target frame rate of the loop
    pub fps: u32,

    // === Spawner ===
    pub spawn_delay_start_ms: u32,
    pub spawn_delay_step_ms: u32,
    pub spawn_delay_floor_ms: u32,
    /// Probability that a spawn is a bomb
    pub bomb_chance: f64,
    /// Probability that a non-bomb spawn is a heart (only below starting lives)
    pub heart_chance: f64,
    /// Vertical band for the top edge of new entities
    pub spawn_y: SpanI32,
    /// Fall speed for fruit and bombs (units/frame)
    pub fall_speed: SpanI32,
    /// Fall speed for hearts (units/frame)
    pub heart_speed: SpanI32,

    // === Player ===
    pub player_width: i32,
    pub player_height: i32,
    pub player_speed: i32,
    pub player_bottom_margin: i32,

    // === Explosion ===
    /// Frames each explosion image is held
    pub explosion_frame_hold: u32,
    pub explosion_frame_count: usize,
    pub explosion_size: i32,

    // === Scoring ===
    pub fruit_points: u64,
    /// Combo length at which the bonus starts
    pub combo_threshold: u32,
    pub combo_step_points: u64,

    // === Lives ===
    pub start_lives: u8,
    pub max_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_width: PLAY_WIDTH,
            play_height: PLAY_HEIGHT,
            fps: FPS,

            spawn_delay_start_ms: SPAWN_DELAY_START_MS,
            spawn_delay_step_ms: SPAWN_DELAY_STEP_MS,
            spawn_delay_floor_ms: SPAWN_DELAY_FLOOR_MS,
            bomb_chance: BOMB_CHANCE,
            heart_chance: HEART_CHANCE,
            spawn_y: SpanI32::new(SPAWN_Y_MIN, SPAWN_Y_MAX),
            fall_speed: SpanI32::new(FALL_SPEED_MIN, FALL_SPEED_MAX),
            heart_speed: SpanI32::new(FALL_SPEED_MIN, FALL_SPEED_MAX),

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,

            explosion_frame_hold: EXPLOSION_FRAME_HOLD,
            explosion_frame_count: EXPLOSION_FRAME_COUNT,
            explosion_size: EXPLOSION_SIZE,

            fruit_points: FRUIT_POINTS,
            combo_threshold: COMBO_THRESHOLD,
            combo_step_points: COMBO_STEP_POINTS,

            start_lives: START_LIVES,
            max_lives: MAX_LIVES,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = fs::read_to_string(path)?;
        let tuning: Tuning = serde_json::from_str(&json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if self.play_width <= 0 || self.play_height <= 0 {
            return invalid("play area must be non-empty");
        }
        if self.fps == 0 {
            return invalid("fps must be positive");
        }
        if self.spawn_delay_floor_ms > self.spawn_delay_start_ms {
            return invalid("spawn delay floor exceeds start delay");
        }
        if !(0.0..=1.0).contains(&self.bomb_chance) || !(0.0..=1.0).contains(&self.heart_chance) {
            return invalid("spawn chances must be within [0, 1]");
        }
        if self.spawn_y.is_empty() || self.fall_speed.is_empty() || self.heart_speed.is_empty() {
            return invalid("random ranges must be non-empty");
        }
        if self.fall_speed.min <= 0 || self.heart_speed.min <= 0 {
            return invalid("fall speeds must be positive");
        }
        if self.player_width <= 0
            || self.player_height <= 0
            || self.player_width > self.play_width
            || self.player_height > self.play_height
        {
            return invalid("player must fit inside the play area");
        }
        if self.explosion_frame_hold == 0 || self.explosion_frame_count == 0 {
            return invalid("explosion needs at least one frame and a positive hold");
        }
        if self.start_lives == 0 || self.start_lives > self.max_lives {
            return invalid("start lives must be within 1..=max_lives");
        }
        Ok(())
    }

    /// Duration of one frame in milliseconds
    pub fn frame_ms(&self) -> u32 {
        1000 / self.fps.max(1)
    }
}
