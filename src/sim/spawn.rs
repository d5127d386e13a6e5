//! Spawn scheduling
//!
//! One timer against the session clock. Each time it fires the cadence
//! tightens by a fixed step down to a floor, and exactly one entity is added.

use glam::IVec2;
use rand::Rng;

use super::state::{EntityKind, GameState, SpawnKind};
use crate::assets::FruitKind;
use crate::tuning::{SpanI32, Tuning};

/// Next spawn delay after a spawn fires
pub fn next_spawn_delay(current_ms: u32, tuning: &Tuning) -> u32 {
    current_ms
        .saturating_sub(tuning.spawn_delay_step_ms)
        .max(tuning.spawn_delay_floor_ms)
}

/// Decide what to spawn from two uniform rolls in [0, 1).
///
/// Hearts only appear below the starting life count.
pub fn choose_kind(tuning: &Tuning, lives: u8, bomb_roll: f64, heart_roll: f64) -> SpawnKind {
    if bomb_roll < tuning.bomb_chance {
        SpawnKind::Bomb
    } else if lives >= tuning.start_lives {
        SpawnKind::Fruit
    } else if heart_roll < tuning.heart_chance {
        SpawnKind::Heart
    } else {
        SpawnKind::Fruit
    }
}

/// Fire the spawn timer if it is due. Returns what was spawned.
pub fn update_spawner<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Option<(u32, SpawnKind)> {
    if state.clock_ms.saturating_sub(state.last_spawn_ms) <= u64::from(state.spawn_delay_ms) {
        return None;
    }

    state.last_spawn_ms = state.clock_ms;
    state.spawn_delay_ms = next_spawn_delay(state.spawn_delay_ms, &state.tuning);

    let bomb_roll: f64 = rng.random();
    let heart_roll: f64 = rng.random();
    let kind = choose_kind(&state.tuning, state.lives, bomb_roll, heart_roll);
    let id = spawn(state, kind, rng);

    log::debug!(
        "Spawned {:?} #{} (next delay {}ms)",
        kind,
        id,
        state.spawn_delay_ms
    );
    Some((id, kind))
}

/// Create one falling entity of the given kind above the play area
pub fn spawn<R: Rng + ?Sized>(state: &mut GameState, kind: SpawnKind, rng: &mut R) -> u32 {
    let tuning = &state.tuning;
    let (visual, size, entity_kind) = match kind {
        SpawnKind::Fruit => {
            let fruit = FruitKind::random(rng);
            let (visual, size) = state.assets.fruit(fruit);
            let speed = draw(rng, tuning.fall_speed);
            (visual, size, EntityKind::Fruit { kind: fruit, speed })
        }
        SpawnKind::Bomb => {
            let (visual, size) = state.assets.bomb();
            let speed = draw(rng, tuning.fall_speed);
            (visual, size, EntityKind::Bomb { speed })
        }
        SpawnKind::Heart => {
            let (visual, size) = state.assets.heart();
            let speed = draw(rng, tuning.heart_speed);
            (visual, size, EntityKind::Heart { speed })
        }
    };

    let pos = spawn_position(tuning, size, rng);
    state.add_entity(pos, size, visual, entity_kind)
}

/// Random top-left corner: fully inside horizontally, above the top edge vertically
pub fn spawn_position<R: Rng + ?Sized>(tuning: &Tuning, size: IVec2, rng: &mut R) -> IVec2 {
    let max_x = (tuning.play_width - size.x).max(1);
    IVec2::new(rng.random_range(0..max_x), draw(rng, tuning.spawn_y))
}

fn draw<R: Rng + ?Sized>(rng: &mut R, span: SpanI32) -> i32 {
    if span.is_empty() {
        span.min
    } else {
        rng.random_range(span.min..span.max)
    }
}
