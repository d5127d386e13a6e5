//! Cell buffer and scene composition
//!
//! Row 0 is the HUD; the remaining rows show the play area.

use glam::IVec2;

use crate::assets::{FruitKind, Rgb, Sheet, Visual};
use crate::sim::{GamePhase, Scene};

/// Checkerboard tile size in play-area units
const TILE_SIZE: i32 = 50;
const TILE_DARK: Rgb = Rgb(20, 20, 30);
const TILE_LIGHT: Rgb = Rgb(30, 30, 40);
const BLACK: Rgb = Rgb(0, 0, 0);
const GREY: Rgb = Rgb(160, 160, 160);

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Rgb::WHITE,
        bg: BLACK,
    };

    /// Never produced by composition; forces a repaint when used as the previous frame
    pub const INVALID: Cell = Cell {
        ch: '?',
        fg: Rgb(255, 0, 255),
        bg: Rgb(255, 0, 255),
    };

    fn solid(bg: Rgb) -> Self {
        Self { ch: ' ', fg: Rgb::WHITE, bg }
    }
}

/// Fixed-size cell buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Cell {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col]
        } else {
            Cell::BLANK
        }
    }

    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = cell;
        }
    }

    /// Write text keeping the background of the cells underneath
    pub fn put_str(&mut self, col: usize, row: usize, text: &str, fg: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            let bg = self.get(col + i, row).bg;
            self.set(col + i, row, Cell { ch, fg, bg });
        }
    }

    /// Write text centered horizontally
    pub fn put_centered(&mut self, row: usize, text: &str, fg: Rgb) {
        let len = text.chars().count();
        self.put_str(self.cols.saturating_sub(len) / 2, row, text, fg);
    }

    /// Text content of a row (for tests and debugging)
    pub fn row_text(&self, row: usize) -> String {
        (0..self.cols).map(|col| self.get(col, row).ch).collect()
    }
}

/// Map play-area boxes onto the cell grid
struct Viewport {
    play: IVec2,
    cols: i64,
    rows: i64,
}

impl Viewport {
    /// Cell rectangle covered by a box, `None` if fully off screen
    fn cells(&self, pos: IVec2, size: IVec2) -> Option<(usize, usize, usize, usize)> {
        let span = |start: i32, len: i32, extent: i32, cells: i64| {
            let a = (i64::from(start) * cells).div_euclid(i64::from(extent));
            let b = (i64::from(start + len) * cells + i64::from(extent) - 1).div_euclid(i64::from(extent));
            // Small boxes still occupy one cell
            let b = b.max(a + 1);
            let (a, b) = (a.max(0), b.min(cells));
            (a < b).then_some((a as usize, b as usize))
        };
        let (c0, c1) = span(pos.x, size.x, self.play.x, self.cols)?;
        let (r0, r1) = span(pos.y, size.y, self.play.y, self.rows)?;
        Some((c0, c1, r0, r1))
    }

    /// Play-area point at the center of a cell
    fn unit_at(&self, col: usize, row: usize) -> IVec2 {
        let x = ((col as i64 * 2 + 1) * i64::from(self.play.x)) / (self.cols * 2);
        let y = ((row as i64 * 2 + 1) * i64::from(self.play.y)) / (self.rows * 2);
        IVec2::new(x as i32, y as i32)
    }
}

/// Cell used to draw a visual
pub fn visual_cell(visual: Visual) -> Cell {
    match visual {
        Visual::Solid(color) => Cell::solid(color),
        Visual::Sprite { sheet: Sheet::Fruit, cell } => {
            let color = FruitKind::from_sheet_cell(cell)
                .map(FruitKind::fallback_color)
                .unwrap_or(Rgb::GREEN);
            Cell::solid(color)
        }
        Visual::Sprite { sheet: Sheet::Bomb, .. } => Cell {
            ch: '*',
            fg: Rgb::RED,
            bg: Rgb(40, 40, 40),
        },
        Visual::Sprite { sheet: Sheet::Heart, .. } => Cell {
            ch: '♥',
            fg: Rgb::WHITE,
            bg: Rgb(200, 30, 60),
        },
        Visual::Sprite {
            sheet: Sheet::Explosion,
            cell: (_, frame),
        } => {
            let fade = frame.saturating_mul(24);
            Cell {
                ch: '#',
                fg: Rgb::YELLOW,
                bg: Rgb(255u8.saturating_sub(fade / 2), 160u8.saturating_sub(fade), 0),
            }
        }
    }
}

/// Build the full grid for a scene
pub fn compose(scene: &Scene, cols: usize, rows: usize) -> Grid {
    let mut grid = Grid::new(cols, rows);
    if cols == 0 || rows < 2 {
        return grid;
    }

    match scene.phase {
        GamePhase::Menu => compose_menu(&mut grid),
        GamePhase::Playing => compose_playing(&mut grid, scene),
        GamePhase::GameOver => compose_game_over(&mut grid, scene),
    }
    grid
}

fn compose_menu(grid: &mut Grid) {
    let rows = grid.rows;
    grid.put_centered(rows / 3, "FRUIT CATCHER", Rgb::WHITE);
    grid.put_centered(rows / 2, "Press ENTER to Start", Rgb::WHITE);
    grid.put_centered(rows / 2 + 2, "Press ESC to Quit", Rgb::WHITE);
    grid.put_centered(rows.saturating_sub(2), "Move with LEFT/RIGHT or A/D", GREY);
}

fn compose_playing(grid: &mut Grid, scene: &Scene) {
    let view = Viewport {
        play: scene.play_size.max(IVec2::ONE),
        cols: grid.cols as i64,
        rows: grid.rows as i64 - 1,
    };

    // Checkerboard background
    for row in 0..grid.rows - 1 {
        for col in 0..grid.cols {
            let unit = view.unit_at(col, row);
            let tile = unit / TILE_SIZE;
            let bg = if (tile.x + tile.y) % 2 == 0 { TILE_LIGHT } else { TILE_DARK };
            grid.set(col, row + 1, Cell::solid(bg));
        }
    }

    for item in &scene.items {
        if let Some((c0, c1, r0, r1)) = view.cells(item.pos, item.size) {
            let cell = visual_cell(item.visual);
            for row in r0..r1 {
                for col in c0..c1 {
                    grid.set(col, row + 1, cell);
                }
            }
        }
    }

    let hud = &scene.hud;
    let mut left = format!("Score: {}", hud.score);
    if hud.combo_count >= 2 {
        left.push_str(&format!("  Combo x{}", hud.combo_count));
    }
    if hud.combo_bonus > 0 {
        left.push_str(&format!(" +{}", hud.combo_bonus));
    }
    grid.put_str(1, 0, &left, Rgb::WHITE);
    grid.put_centered(0, "Press R to restart", GREY);

    let lives = format!("Lives: {}", hud.lives);
    let col = grid.cols.saturating_sub(lives.chars().count() + 1);
    grid.put_str(col, 0, &lives, Rgb::WHITE);
}

fn compose_game_over(grid: &mut Grid, scene: &Scene) {
    let rows = grid.rows;
    grid.put_centered(rows / 3, "GAME OVER", Rgb::RED);
    grid.put_centered(rows / 2, &format!("Final Score: {}", scene.hud.score), Rgb::WHITE);
    grid.put_centered(rows / 2 + 2, "Press SPACE to restart", Rgb::YELLOW);
    grid.put_centered(rows / 2 + 4, "Press ENTER to return to menu", Rgb::WHITE);
}
