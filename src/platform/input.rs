//! Key event collection
//!
//! Terminals differ in what they report. With keyboard enhancement we get
//! press/repeat/release and track held keys exactly. Classic terminals only
//! send repeated presses, so a direction counts as held while its last
//! press arrived within [`HOLD_WINDOW`] frames.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::{Command, TickInput};

/// Frames a direction stays held after its last press/repeat (~133ms at 60 Hz)
pub const HOLD_WINDOW: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

fn map_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

/// Map a key press to a command
pub fn map_command(event: &KeyEvent) -> Option<Command> {
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Enter => Some(Command::Confirm),
        KeyCode::Esc => Some(Command::Cancel),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char(' ') => Some(Command::Replay),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

/// Accumulates key events between frames
#[derive(Debug, Default)]
pub struct InputCollector {
    frame: u64,
    /// The terminal reports key releases, so held keys never time out
    release_events: bool,
    /// Frame each direction was last seen, `None` when released
    left_seen: Option<u64>,
    right_seen: Option<u64>,
    commands: Vec<Command>,
}

impl InputCollector {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            ..Self::default()
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        let direction = map_direction(event.code);
        match event.kind {
            KeyEventKind::Press => {
                if let Some(direction) = direction {
                    self.mark(direction, Some(self.frame));
                } else if let Some(command) = map_command(&event) {
                    self.commands.push(command);
                }
            }
            KeyEventKind::Repeat => {
                if let Some(direction) = direction {
                    self.mark(direction, Some(self.frame));
                }
            }
            KeyEventKind::Release => {
                if let Some(direction) = direction {
                    self.mark(direction, None);
                }
            }
        }
    }

    /// Input for the coming tick; clears queued commands and advances the frame
    pub fn take_input(&mut self) -> TickInput {
        let held = |seen: Option<u64>| {
            seen.is_some_and(|f| self.release_events || self.frame.saturating_sub(f) <= HOLD_WINDOW)
        };
        let input = TickInput {
            commands: std::mem::take(&mut self.commands),
            left: held(self.left_seen),
            right: held(self.right_seen),
        };
        self.frame += 1;
        input
    }

    fn mark(&mut self, direction: Direction, frame: Option<u64>) {
        match direction {
            Direction::Left => self.left_seen = frame,
            Direction::Right => self.right_seen = frame,
        }
    }
}
