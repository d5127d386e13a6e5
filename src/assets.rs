//! Visual lookup for entities
//!
//! Image files are only checked for presence, never decoded here. A missing
//! file is not an error: the affected entity falls back to a solid-color
//! placeholder and the game plays the same.

use std::path::Path;

use glam::IVec2;
use rand::Rng;

use crate::consts::{FALLBACK_SIZE, FRUIT_KIND_COUNT, SPRITE_SIZE};

/// Columns in the full rows of the fruit sheet
const SHEET_COLUMNS: u8 = 5;
/// Number of fruits in the full rows (5 columns x 2 rows)
const FULL_ROW_FRUITS: u8 = 10;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
}

/// Identifies one of the 13 fruit kinds. Only used for combo equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FruitKind(u8);

impl FruitKind {
    /// Build a fruit kind from an index, `None` if out of range
    pub fn new(index: u8) -> Option<Self> {
        (index < FRUIT_KIND_COUNT).then_some(Self(index))
    }

    /// Draw a fruit kind uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(0..FRUIT_KIND_COUNT))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Tile position on the fruit sheet as (row, col).
    ///
    /// The first two rows are full; the last row holds three fruits.
    pub fn sheet_cell(self) -> (u8, u8) {
        if self.0 < FULL_ROW_FRUITS {
            (self.0 / SHEET_COLUMNS, self.0 % SHEET_COLUMNS)
        } else {
            (2, self.0 - FULL_ROW_FRUITS)
        }
    }

    /// Inverse of [`FruitKind::sheet_cell`]
    pub fn from_sheet_cell((row, col): (u8, u8)) -> Option<Self> {
        match row {
            0 | 1 if col < SHEET_COLUMNS => Self::new(row * SHEET_COLUMNS + col),
            2 => Self::new(FULL_ROW_FRUITS + col),
            _ => None,
        }
    }

    /// Placeholder color used when the sheet is unavailable
    pub fn fallback_color(self) -> Rgb {
        const PALETTE: [Rgb; FRUIT_KIND_COUNT as usize] = [
            Rgb(0, 255, 0),
            Rgb(255, 140, 0),
            Rgb(255, 220, 0),
            Rgb(200, 0, 200),
            Rgb(120, 255, 120),
            Rgb(255, 100, 120),
            Rgb(0, 200, 120),
            Rgb(170, 90, 40),
            Rgb(255, 180, 200),
            Rgb(120, 60, 200),
            Rgb(180, 255, 0),
            Rgb(0, 180, 255),
            Rgb(255, 255, 160),
        ];
        PALETTE[self.0 as usize]
    }
}

/// Image sources known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Fruit,
    Bomb,
    Heart,
    Explosion,
}

impl Sheet {
    pub const ALL: [Sheet; 4] = [Sheet::Fruit, Sheet::Bomb, Sheet::Heart, Sheet::Explosion];

    pub fn file_name(self) -> &'static str {
        match self {
            Sheet::Fruit => "fruit_spritesheet.png",
            Sheet::Bomb => "bomb.png",
            Sheet::Heart => "heart.png",
            Sheet::Explosion => "explosion.png",
        }
    }
}

/// What to draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    /// A tile (row, col) of an image sheet
    Sprite { sheet: Sheet, cell: (u8, u8) },
    /// Solid-color placeholder
    Solid(Rgb),
}

/// Which image files are available
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    fruit: bool,
    bomb: bool,
    heart: bool,
    explosion: bool,
}

impl AssetCatalog {
    /// Catalog with no images: everything uses placeholders
    pub fn fallback() -> Self {
        Self::default()
    }

    /// Check which image files exist under `dir`
    pub fn discover(dir: &Path) -> Self {
        let mut catalog = Self::default();
        for sheet in Sheet::ALL {
            let path = dir.join(sheet.file_name());
            let found = path.is_file();
            if !found {
                log::warn!("Missing image {}, using solid color", path.display());
            }
            match sheet {
                Sheet::Fruit => catalog.fruit = found,
                Sheet::Bomb => catalog.bomb = found,
                Sheet::Heart => catalog.heart = found,
                Sheet::Explosion => catalog.explosion = found,
            }
        }
        catalog
    }

    pub fn has(&self, sheet: Sheet) -> bool {
        match sheet {
            Sheet::Fruit => self.fruit,
            Sheet::Bomb => self.bomb,
            Sheet::Heart => self.heart,
            Sheet::Explosion => self.explosion,
        }
    }

    pub fn fruit(&self, kind: FruitKind) -> (Visual, IVec2) {
        if self.fruit {
            let visual = Visual::Sprite {
                sheet: Sheet::Fruit,
                cell: kind.sheet_cell(),
            };
            (visual, IVec2::splat(SPRITE_SIZE))
        } else {
            (Visual::Solid(kind.fallback_color()), IVec2::splat(FALLBACK_SIZE))
        }
    }

    pub fn bomb(&self) -> (Visual, IVec2) {
        if self.bomb {
            let visual = Visual::Sprite {
                sheet: Sheet::Bomb,
                cell: (0, 0),
            };
            (visual, IVec2::splat(FALLBACK_SIZE))
        } else {
            (Visual::Solid(Rgb::RED), IVec2::splat(FALLBACK_SIZE))
        }
    }

    pub fn heart(&self) -> (Visual, IVec2) {
        if self.heart {
            let visual = Visual::Sprite {
                sheet: Sheet::Heart,
                cell: (0, 0),
            };
            (visual, IVec2::splat(SPRITE_SIZE))
        } else {
            (Visual::Solid(Rgb::GREEN), IVec2::splat(FALLBACK_SIZE))
        }
    }

    pub fn player(&self) -> Visual {
        Visual::Solid(Rgb::BLUE)
    }

    /// Explosion animation frames, left to right on the sheet
    pub fn explosion_frames(&self, count: usize) -> Vec<Visual> {
        if self.explosion {
            (0..count)
                .map(|i| Visual::Sprite {
                    sheet: Sheet::Explosion,
                    cell: (0, i.min(u8::MAX as usize) as u8),
                })
                .collect()
        } else {
            // Fade from white-hot to dark red
            (0..count)
                .map(|i| {
                    let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.0 };
                    let g = (230.0 * (1.0 - t)) as u8;
                    let r = (255.0 - 120.0 * t) as u8;
                    Visual::Solid(Rgb(r, g, (60.0 * (1.0 - t)) as u8))
                })
                .collect()
        }
    }
}
