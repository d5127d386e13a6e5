//! Collision resolution and scoring
//!
//! Runs once per frame after everything has moved. Three passes (fruit,
//! bomb, heart) test the player box against each entity of the relevant
//! kind; every overlapping entity is consumed and handled in spawn order.

use glam::IVec2;

use super::state::{Entity, EntityKind, Explosion, GameEvent, GamePhase, GameState};
use crate::assets::FruitKind;
use crate::{box_center, boxes_overlap};

/// Points for one catch given the combo length after that catch
pub fn catch_points(combo_count: u32, base: u64, threshold: u32, step: u64) -> (u64, u64) {
    let bonus = if combo_count >= threshold {
        u64::from(combo_count + 1 - threshold) * step
    } else {
        0
    };
    (base + bonus, bonus)
}

/// Apply the combo rule for one caught fruit. Returns the points awarded.
pub fn catch_fruit(state: &mut GameState, kind: FruitKind) -> u64 {
    if state.last_fruit_kind == Some(kind) {
        state.combo_count += 1;
    } else {
        state.combo_count = 1;
        state.last_fruit_kind = Some(kind);
    }

    let tuning = &state.tuning;
    let (points, bonus) = catch_points(
        state.combo_count,
        tuning.fruit_points,
        tuning.combo_threshold,
        tuning.combo_step_points,
    );
    state.combo_bonus = bonus;
    state.score += points;
    points
}

/// Apply a bomb hit. Returns true if it ended the game.
pub fn hit_bomb(state: &mut GameState, bomb_center: IVec2) -> bool {
    let tuning = &state.tuning;
    let frames = state.assets.explosion_frames(tuning.explosion_frame_count);
    let size = IVec2::splat(tuning.explosion_size);
    let explosion = Explosion::new(frames, tuning.explosion_frame_hold);
    if let Some(visual) = explosion.visual() {
        state.add_entity(bomb_center - size / 2, size, visual, EntityKind::Explosion(explosion));
    }

    state.combo_count = 0;
    state.last_fruit_kind = None;
    state.combo_bonus = 0;
    state.lives = state.lives.saturating_sub(1);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        true
    } else {
        false
    }
}

/// Apply a heart pickup. Breaks any combo in progress.
pub fn catch_heart(state: &mut GameState) {
    state.lives = state.lives.saturating_add(1).min(state.tuning.max_lives);
    state.combo_count = 0;
}

/// Resolve all player overlaps for this frame
pub fn resolve_collisions(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let Some((player_pos, player_size)) = state.player.as_ref().map(|p| (p.pos, p.size)) else {
        return events;
    };

    // Fruit pass
    for fruit in take_overlapping(state, player_pos, player_size, |k| {
        matches!(k, EntityKind::Fruit { .. })
    }) {
        if let EntityKind::Fruit { kind, .. } = fruit.kind {
            let points = catch_fruit(state, kind);
            log::debug!(
                "Caught fruit {} for {} (combo {}, bonus {})",
                kind.index(),
                points,
                state.combo_count,
                state.combo_bonus
            );
            events.push(GameEvent::FruitCaught {
                kind,
                points,
                combo: state.combo_count,
            });
        }
    }

    // Bomb pass
    for bomb in take_overlapping(state, player_pos, player_size, |k| {
        matches!(k, EntityKind::Bomb { .. })
    }) {
        let game_over = hit_bomb(state, box_center(bomb.pos, bomb.size));
        log::debug!("Bomb hit, {} lives left", state.lives);
        events.push(GameEvent::BombHit { lives: state.lives });
        if game_over {
            log::info!("Game over with score {}", state.score);
            events.push(GameEvent::GameOver { score: state.score });
            return events;
        }
    }

    // Heart pass
    for _heart in take_overlapping(state, player_pos, player_size, |k| {
        matches!(k, EntityKind::Heart { .. })
    }) {
        catch_heart(state);
        log::debug!("Caught heart, {} lives", state.lives);
        events.push(GameEvent::HeartCaught { lives: state.lives });
    }

    events
}

/// Remove and return entities matching `filter` that overlap the player, in id order
fn take_overlapping<F>(state: &mut GameState, pos: IVec2, size: IVec2, filter: F) -> Vec<Entity>
where
    F: Fn(&EntityKind) -> bool,
{
    let (hits, kept): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut state.entities)
        .into_iter()
        .partition(|e| filter(&e.kind) && boxes_overlap(pos, size, e.pos, e.size));
    state.entities = kept;
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Rgb, Visual};
    use proptest::prelude::*;

    fn kind(index: u8) -> FruitKind {
        FruitKind::new(index).expect("valid fruit kind")
    }

    fn playing() -> GameState {
        let mut state = GameState::default();
        state.new_game();
        state
    }

    /// Place an entity right on top of the player
    fn drop_on_player(state: &mut GameState, entity: EntityKind) -> u32 {
        let player = state.player.as_ref().expect("player");
        let pos = player.pos;
        state.add_entity(pos, IVec2::splat(30), Visual::Solid(Rgb::GREEN), entity)
    }

    #[test]
    fn test_box_overlap_is_strict() {
        let a = IVec2::new(0, 0);
        let size = IVec2::splat(10);
        assert!(boxes_overlap(a, size, IVec2::new(9, 9), size));
        assert!(!boxes_overlap(a, size, IVec2::new(10, 0), size));
        assert!(!boxes_overlap(a, size, IVec2::new(0, 10), size));
        assert!(!boxes_overlap(a, size, IVec2::new(-10, 0), size));
    }

    #[test]
    fn test_combo_bonus_law() {
        let mut state = playing();
        let mut combos = Vec::new();
        let mut bonuses = Vec::new();

        for _ in 0..5 {
            catch_fruit(&mut state, kind(4));
            combos.push(state.combo_count);
            bonuses.push(state.combo_bonus);
        }

        assert_eq!(combos, vec![1, 2, 3, 4, 5]);
        assert_eq!(bonuses, vec![0, 0, 20, 40, 60]);
        assert_eq!(state.score, 170);
    }

    #[test]
    fn test_different_kind_restarts_combo() {
        let mut state = playing();
        for _ in 0..3 {
            catch_fruit(&mut state, kind(1));
        }
        assert_eq!(state.combo_bonus, 20);

        let points = catch_fruit(&mut state, kind(2));
        assert_eq!(points, 10);
        assert_eq!(state.combo_count, 1);
        assert_eq!(state.combo_bonus, 0);
        assert_eq!(state.last_fruit_kind, Some(kind(2)));
    }

    #[test]
    fn test_bomb_clears_combo() {
        let mut state = playing();
        for _ in 0..4 {
            catch_fruit(&mut state, kind(7));
        }
        let ended = hit_bomb(&mut state, IVec2::new(400, 570));

        assert!(!ended);
        assert_eq!(state.combo_count, 0);
        assert_eq!(state.last_fruit_kind, None);
        assert_eq!(state.combo_bonus, 0);
        assert_eq!(state.lives, 2);
        assert!(matches!(state.entities[0].kind, EntityKind::Explosion(_)));
        assert_eq!(state.entities[0].pos + state.entities[0].size / 2, IVec2::new(400, 570));
    }

    #[test]
    fn test_heart_breaks_combo_and_caps_lives() {
        let mut state = playing();
        catch_fruit(&mut state, kind(0));
        catch_fruit(&mut state, kind(0));

        for _ in 0..10 {
            catch_heart(&mut state);
        }
        assert_eq!(state.lives, 5);
        assert_eq!(state.combo_count, 0);
        // The last kind is remembered, so the next same-kind catch counts from zero
        catch_fruit(&mut state, kind(0));
        assert_eq!(state.combo_count, 1);
    }

    #[test]
    fn test_last_life_ends_game_and_stops_processing() {
        let mut state = playing();
        state.lives = 1;
        drop_on_player(&mut state, EntityKind::Bomb { speed: 3 });
        drop_on_player(&mut state, EntityKind::Bomb { speed: 3 });
        drop_on_player(&mut state, EntityKind::Heart { speed: 3 });

        let events = resolve_collisions(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0 }));
        // Heart pass never ran
        assert!(state.entities.iter().any(|e| matches!(e.kind, EntityKind::Heart { .. })));
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::BombHit { .. })).count(),
            1
        );
        // The second bomb is consumed without costing a life
        assert!(!state.entities.iter().any(|e| matches!(e.kind, EntityKind::Bomb { .. })));
    }

    #[test]
    fn test_hearts_caught_together_each_heal_up_to_cap() {
        let mut state = playing();
        state.lives = 4;
        drop_on_player(&mut state, EntityKind::Heart { speed: 3 });
        drop_on_player(&mut state, EntityKind::Heart { speed: 3 });

        let events = resolve_collisions(&mut state);

        assert_eq!(state.lives, 5);
        assert!(!state.entities.iter().any(|e| matches!(e.kind, EntityKind::Heart { .. })));
        assert_eq!(
            events,
            vec![GameEvent::HeartCaught { lives: 5 }, GameEvent::HeartCaught { lives: 5 }]
        );
    }

    #[test]
    fn test_simultaneous_catches_chain_in_spawn_order() {
        let mut state = playing();
        for _ in 0..3 {
            drop_on_player(&mut state, EntityKind::Fruit { kind: kind(5), speed: 4 });
        }

        let events = resolve_collisions(&mut state);

        assert_eq!(state.score, 10 + 10 + 30);
        assert_eq!(state.combo_count, 3);
        assert_eq!(events.len(), 3);
        assert_eq!(state.falling_count(), 0);
    }

    #[test]
    fn test_far_entities_are_untouched() {
        let mut state = playing();
        state.add_entity(
            IVec2::new(0, 0),
            IVec2::splat(30),
            Visual::Solid(Rgb::RED),
            EntityKind::Bomb { speed: 5 },
        );
        let events = resolve_collisions(&mut state);
        assert!(events.is_empty());
        assert_eq!(state.lives, 3);
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_no_player_no_collisions() {
        let mut state = GameState::default();
        state.add_entity(IVec2::ZERO, IVec2::splat(30), Visual::Solid(Rgb::RED), EntityKind::Bomb { speed: 5 });
        assert!(resolve_collisions(&mut state).is_empty());
    }

    /// Expected score for a catch sequence, computed independently
    fn expected_score(kinds: &[u8]) -> u64 {
        let mut total = 0;
        let mut run = 0u64;
        let mut last = None;
        for &k in kinds {
            run = if last == Some(k) { run + 1 } else { 1 };
            last = Some(k);
            total += 10 + if run >= 3 { (run - 2) * 20 } else { 0 };
        }
        total
    }

    proptest! {
        #[test]
        fn prop_score_matches_combo_rule(kinds in proptest::collection::vec(0u8..13, 0..60)) {
            let mut state = playing();
            for &k in &kinds {
                catch_fruit(&mut state, kind(k));
            }
            prop_assert_eq!(state.score, expected_score(&kinds));
        }

        #[test]
        fn prop_lives_stay_clamped(ops in proptest::collection::vec(any::<bool>(), 0..80)) {
            let mut state = playing();
            for heart in ops {
                if heart {
                    catch_heart(&mut state);
                } else {
                    let ended = hit_bomb(&mut state, IVec2::ZERO);
                    prop_assert_eq!(ended, state.lives == 0);
                }
                prop_assert!(state.lives <= 5);
                if state.lives == 0 {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
            }
        }
    }
}
