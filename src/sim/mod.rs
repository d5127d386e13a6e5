//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through the `dt_ms` passed to `tick`
//! - Randomness only through the injected RNG
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod scene;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{catch_fruit, catch_heart, catch_points, hit_bomb, resolve_collisions};
pub use scene::{DrawItem, Hud, Scene};
pub use spawn::{choose_kind, next_spawn_delay, spawn, update_spawner};
pub use state::{Entity, EntityKind, Explosion, GameEvent, GamePhase, GameState, Player, SpawnKind};
pub use tick::{Command, TickInput, handle_command, tick};
