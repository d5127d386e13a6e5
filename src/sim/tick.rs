//! Per-frame simulation step and phase transitions
//!
//! Commands are applied first, in arrival order. The simulation only
//! advances while Playing: spawn check, motion, collisions, end check.

use rand::Rng;

use super::collision::resolve_collisions;
use super::spawn::update_spawner;
use super::state::{GameEvent, GamePhase, GameState};

/// Discrete key-down commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a game / continue
    Confirm,
    /// Back out (to the menu, or exit from the menu)
    Cancel,
    /// Start over immediately
    Restart,
    /// Play again, only from the game over screen
    Replay,
    /// End the run loop
    Quit,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands received since the previous tick, oldest first
    pub commands: Vec<Command>,
    /// Left direction held
    pub left: bool,
    /// Right direction held
    pub right: bool,
}

impl TickInput {
    pub fn command(command: Command) -> Self {
        Self {
            commands: vec![command],
            ..Default::default()
        }
    }

    /// Horizontal direction (-1, 0, 1); opposite keys cancel out
    pub fn direction(&self) -> i32 {
        i32::from(self.right) - i32::from(self.left)
    }
}

/// Apply one command to the phase machine
pub fn handle_command(state: &mut GameState, command: Command) -> Option<GameEvent> {
    let event = match (state.phase, command) {
        (GamePhase::Menu, Command::Confirm)
        | (GamePhase::Playing | GamePhase::GameOver, Command::Restart)
        | (GamePhase::GameOver, Command::Replay) => {
            state.new_game();
            GameEvent::NewGame
        }
        (GamePhase::Playing, Command::Cancel) | (GamePhase::GameOver, Command::Confirm) => {
            state.phase = GamePhase::Menu;
            log::info!("Returned to menu");
            GameEvent::ReturnedToMenu
        }
        (GamePhase::Menu | GamePhase::GameOver, Command::Cancel) | (_, Command::Quit) => {
            state.running = false;
            log::info!("Quit requested");
            GameEvent::Quit
        }
        _ => return None,
    };
    Some(event)
}

/// Advance the game by one frame of `dt_ms` milliseconds
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, input: &TickInput, dt_ms: u32, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for &command in &input.commands {
        if let Some(event) = handle_command(state, command) {
            events.push(event);
        }
        if !state.running {
            return events;
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;
    state.clock_ms += u64::from(dt_ms);

    if let Some((id, kind)) = update_spawner(state, rng) {
        events.push(GameEvent::Spawned { id, kind });
    }

    let play_width = state.tuning.play_width;
    let play_height = state.tuning.play_height;
    if let Some(player) = state.player.as_mut() {
        player.step(input.direction(), play_width);
    }
    state.entities.retain_mut(|entity| entity.update(play_height));

    events.extend(resolve_collisions(state));

    if state.lives == 0 && state.phase == GamePhase::Playing {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver { score: state.score });
    }

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{FruitKind, Rgb, Visual};
    use crate::sim::state::{EntityKind, SpawnKind};
    use glam::IVec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: u32 = 16;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    fn started() -> GameState {
        let mut state = GameState::default();
        tick(&mut state, &TickInput::command(Command::Confirm), DT, &mut rng());
        state
    }

    #[test]
    fn test_menu_confirm_starts_game() {
        let mut state = GameState::default();
        let events = tick(&mut state, &TickInput::command(Command::Confirm), DT, &mut rng());

        assert_eq!(events.first(), Some(&GameEvent::NewGame));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.player.is_some());
        assert_eq!(state.falling_count(), 0);
    }

    #[test]
    fn test_menu_ignores_simulation() {
        let mut state = GameState::default();
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), DT, &mut rng());
        }
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.entities.is_empty());
        assert_eq!(state.clock_ms, 0);
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = started();

        handle_command(&mut state, Command::Cancel);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.running);

        handle_command(&mut state, Command::Confirm);
        assert_eq!(state.phase, GamePhase::Playing);

        state.score = 50;
        handle_command(&mut state, Command::Restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);

        state.phase = GamePhase::GameOver;
        handle_command(&mut state, Command::Confirm);
        assert_eq!(state.phase, GamePhase::Menu);

        state.phase = GamePhase::GameOver;
        handle_command(&mut state, Command::Restart);
        assert_eq!(state.phase, GamePhase::Playing);

        // Confirm does nothing while playing, restart does nothing in the menu
        assert_eq!(handle_command(&mut state, Command::Confirm), None);
        state.phase = GamePhase::Menu;
        assert_eq!(handle_command(&mut state, Command::Restart), None);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_replay_only_from_game_over() {
        let mut state = started();
        state.score = 40;
        assert_eq!(handle_command(&mut state, Command::Replay), None);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 40);

        state.phase = GamePhase::Menu;
        assert_eq!(handle_command(&mut state, Command::Replay), None);
        assert_eq!(state.phase, GamePhase::Menu);

        state.phase = GamePhase::GameOver;
        assert_eq!(handle_command(&mut state, Command::Replay), Some(GameEvent::NewGame));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_quit_paths() {
        for phase in [GamePhase::Menu, GamePhase::GameOver] {
            let mut state = GameState::default();
            state.phase = phase;
            handle_command(&mut state, Command::Cancel);
            assert!(!state.running);
        }
        for phase in [GamePhase::Menu, GamePhase::Playing, GamePhase::GameOver] {
            let mut state = GameState::default();
            state.phase = phase;
            assert_eq!(handle_command(&mut state, Command::Quit), Some(GameEvent::Quit));
            assert!(!state.running);
        }
    }

    #[test]
    fn test_quit_stops_processing_commands() {
        let mut state = GameState::default();
        let input = TickInput {
            commands: vec![Command::Quit, Command::Confirm],
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut rng());
        assert!(!state.running);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_first_spawn_after_initial_delay() {
        let mut state = started();
        let mut rng = rng();
        let mut first_spawn = None;

        for frame in 1..=200u64 {
            let events = tick(&mut state, &TickInput::default(), DT, &mut rng);
            if events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })) {
                first_spawn = Some(frame);
                break;
            }
        }
        // Started on the confirm frame (16ms), first spawn once > 2000ms have passed
        assert_eq!(first_spawn, Some(125));
        assert_eq!(state.spawn_delay_ms, 1980);
    }

    #[test]
    fn test_entity_despawn_frame() {
        let mut state = started();
        // Keep the spawner quiet
        state.spawn_delay_ms = u32::MAX;
        state.add_entity(
            IVec2::new(0, -50),
            IVec2::splat(30),
            Visual::Solid(Rgb::GREEN),
            EntityKind::Fruit {
                kind: FruitKind::new(0).unwrap(),
                speed: 7,
            },
        );

        // Smallest k with -50 + 7k > 600 is k = 93
        for _ in 0..92 {
            tick(&mut state, &TickInput::default(), DT, &mut rng());
            assert_eq!(state.entities.len(), 1);
        }
        tick(&mut state, &TickInput::default(), DT, &mut rng());
        assert!(state.entities.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut state = started();
        let start_x = state.player.as_ref().unwrap().pos.x;
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut rng());
        assert_eq!(state.player.as_ref().unwrap().pos.x, start_x - 7);

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both, DT, &mut rng());
        assert_eq!(state.player.as_ref().unwrap().pos.x, start_x - 7);
    }

    #[test]
    fn test_bomb_on_last_life_ends_game_same_frame() {
        let mut state = started();
        state.lives = 1;
        state.spawn_delay_ms = u32::MAX;
        let player = state.player.as_ref().unwrap();
        let target = IVec2::new(player.pos.x, player.pos.y - 3);
        state.add_entity(target, IVec2::splat(30), Visual::Solid(Rgb::RED), EntityKind::Bomb { speed: 3 });

        let events = tick(&mut state, &TickInput::default(), DT, &mut rng());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));

        // Game over freezes the simulation
        let clock = state.clock_ms;
        tick(&mut state, &TickInput::default(), DT, &mut rng());
        assert_eq!(state.clock_ms, clock);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = started();
        let mut state2 = started();
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);

        for frame in 0..3000 {
            let input = TickInput {
                left: frame % 90 < 45,
                right: frame % 90 >= 45,
                ..Default::default()
            };
            tick(&mut state1, &input, DT, &mut rng1);
            tick(&mut state2, &input, DT, &mut rng2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.entities, state2.entities);
    }

    #[test]
    fn test_spawned_kinds_respect_lives() {
        let mut state = started();
        let mut rng = rng();
        for _ in 0..5000 {
            let lives_before = state.lives;
            let events = tick(&mut state, &TickInput::default(), DT, &mut rng);
            for event in events {
                if let GameEvent::Spawned { kind, .. } = event {
                    if lives_before >= 3 {
                        assert_ne!(kind, SpawnKind::Heart);
                    }
                }
            }
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    proptest! {
        #[test]
        fn prop_despawn_on_first_frame_past_bottom(y0 in -100i32..-40, speed in 3i32..8) {
            let mut state = started();
            state.spawn_delay_ms = u32::MAX;
            // Far left so the centered player never touches it
            state.add_entity(IVec2::new(0, y0), IVec2::splat(30), Visual::Solid(Rgb::RED), EntityKind::Bomb { speed });

            let expected = (1..).find(|k| y0 + k * speed > 600).unwrap();
            let mut frames = 0;
            while !state.entities.is_empty() {
                tick(&mut state, &TickInput::default(), DT, &mut rng());
                frames += 1;
            }
            prop_assert_eq!(frames, expected);
        }
    }
}
