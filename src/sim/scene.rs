//! Read-only view of the game for the renderer

use glam::IVec2;

use super::state::{GamePhase, GameState};
use crate::assets::Visual;

/// One box to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub pos: IVec2,
    pub size: IVec2,
    pub visual: Visual,
}

/// Overlay values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub combo_count: u32,
    pub combo_bonus: u64,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub phase: GamePhase,
    pub play_size: IVec2,
    /// Back to front: entities in spawn order, player last
    pub items: Vec<DrawItem>,
    pub hud: Hud,
}

impl Scene {
    pub fn build(state: &GameState) -> Self {
        let mut items: Vec<DrawItem> = state
            .entities
            .iter()
            .map(|e| DrawItem {
                pos: e.pos,
                size: e.size,
                visual: e.visual,
            })
            .collect();

        if let Some(player) = &state.player {
            items.push(DrawItem {
                pos: player.pos,
                size: player.size,
                visual: player.visual,
            });
        }

        Self {
            phase: state.phase,
            play_size: IVec2::new(state.tuning.play_width, state.tuning.play_height),
            items,
            hud: Hud {
                score: state.score,
                lives: state.lives,
                combo_count: state.combo_count,
                combo_bonus: state.combo_bonus,
            },
        }
    }
}
