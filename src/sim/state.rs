//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`].

use glam::IVec2;

use crate::assets::{AssetCatalog, FruitKind, Visual};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Lives ran out
    GameOver,
}

/// What a spawn tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Fruit,
    Bomb,
    Heart,
}

/// Something that happened during a tick (for logging and effects)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    NewGame,
    Spawned { id: u32, kind: SpawnKind },
    FruitCaught { kind: FruitKind, points: u64, combo: u32 },
    BombHit { lives: u8 },
    HeartCaught { lives: u8 },
    GameOver { score: u64 },
    ReturnedToMenu,
    Quit,
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    /// Horizontal speed in units/frame
    pub speed: i32,
    pub visual: Visual,
}

impl Player {
    /// Centered horizontally, resting just above the bottom edge
    pub fn new(tuning: &Tuning, visual: Visual) -> Self {
        let size = IVec2::new(tuning.player_width, tuning.player_height);
        let pos = IVec2::new(
            tuning.play_width / 2 - size.x / 2,
            tuning.play_height - tuning.player_bottom_margin - size.y,
        );
        Self {
            pos,
            size,
            speed: tuning.player_speed,
            visual,
        }
    }

    /// Move by `direction` (-1, 0, 1) times speed and keep inside the play area
    pub fn step(&mut self, direction: i32, play_width: i32) {
        self.pos.x += direction.signum() * self.speed;
        self.pos.x = self.pos.x.clamp(0, (play_width - self.size.x).max(0));
    }
}

/// Explosion animation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explosion {
    pub frames: Vec<Visual>,
    pub current: usize,
    /// Frames elapsed since creation
    pub counter: u32,
    /// Frames each image is held
    pub frame_hold: u32,
}

impl Explosion {
    pub fn new(frames: Vec<Visual>, frame_hold: u32) -> Self {
        Self {
            frames,
            current: 0,
            counter: 0,
            frame_hold: frame_hold.max(1),
        }
    }

    /// Advance one frame. Returns false once the last image has been shown.
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter % self.frame_hold == 0 {
            self.current += 1;
        }
        self.current < self.frames.len()
    }

    pub fn visual(&self) -> Option<Visual> {
        self.frames.get(self.current).copied()
    }
}

/// Kind-specific entity data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Fruit { kind: FruitKind, speed: i32 },
    Bomb { speed: i32 },
    Heart { speed: i32 },
    Explosion(Explosion),
}

impl EntityKind {
    /// Fall speed, `None` for stationary kinds
    pub fn speed(&self) -> Option<i32> {
        match self {
            EntityKind::Fruit { speed, .. } | EntityKind::Bomb { speed } | EntityKind::Heart { speed } => {
                Some(*speed)
            }
            EntityKind::Explosion(_) => None,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.speed().is_some()
    }
}

/// A non-player entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    pub visual: Visual,
    pub kind: EntityKind,
}

impl Entity {
    /// Apply the per-frame rule. Returns false when the entity should be removed.
    pub fn update(&mut self, play_height: i32) -> bool {
        match &mut self.kind {
            EntityKind::Fruit { speed, .. } | EntityKind::Bomb { speed } | EntityKind::Heart { speed } => {
                self.pos.y += *speed;
                // Despawn once the top edge is below the visible area
                self.pos.y <= play_height
            }
            EntityKind::Explosion(explosion) => {
                let alive = explosion.advance();
                if let Some(visual) = explosion.visual() {
                    self.visual = visual;
                }
                alive
            }
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub assets: AssetCatalog,
    /// Current phase
    pub phase: GamePhase,
    /// False once a quit command was processed
    pub running: bool,
    pub score: u64,
    /// Player lives, clamped to [0, max_lives]
    pub lives: u8,
    /// Length of the current same-kind catch run
    pub combo_count: u32,
    pub last_fruit_kind: Option<FruitKind>,
    /// Bonus awarded by the most recent catch (for display)
    pub combo_bonus: u64,
    /// Current minimum interval between spawns
    pub spawn_delay_ms: u32,
    /// Milliseconds of play in this session
    pub clock_ms: u64,
    pub last_spawn_ms: u64,
    /// Simulation tick counter for this session
    pub time_ticks: u64,
    /// Created by the first new game
    pub player: Option<Player>,
    /// Active entities (sorted by id, which is spawn order)
    pub entities: Vec<Entity>,
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default(), AssetCatalog::fallback())
    }
}

impl GameState {
    /// Fresh state sitting in the menu
    pub fn new(tuning: Tuning, assets: AssetCatalog) -> Self {
        Self {
            phase: GamePhase::Menu,
            running: true,
            score: 0,
            lives: tuning.start_lives,
            combo_count: 0,
            last_fruit_kind: None,
            combo_bonus: 0,
            spawn_delay_ms: tuning.spawn_delay_start_ms,
            clock_ms: 0,
            last_spawn_ms: 0,
            time_ticks: 0,
            player: None,
            entities: Vec::new(),
            next_id: 1,
            tuning,
            assets,
        }
    }

    /// Reset the session and enter Playing
    pub fn new_game(&mut self) {
        self.score = 0;
        self.lives = self.tuning.start_lives;
        self.combo_count = 0;
        self.last_fruit_kind = None;
        self.combo_bonus = 0;
        self.spawn_delay_ms = self.tuning.spawn_delay_start_ms;
        self.clock_ms = 0;
        self.last_spawn_ms = 0;
        self.time_ticks = 0;
        self.entities.clear();
        self.next_id = 1;
        self.player = Some(Player::new(&self.tuning, self.assets.player()));
        self.phase = GamePhase::Playing;
        log::info!("New game started");
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an entity and return its ID
    pub fn add_entity(&mut self, pos: IVec2, size: IVec2, visual: Visual, kind: EntityKind) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            pos,
            size,
            visual,
            kind,
        });
        id
    }

    /// Number of fruit, bombs and hearts in play
    pub fn falling_count(&self) -> usize {
        self.entities.iter().filter(|e| e.kind.is_falling()).count()
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}
