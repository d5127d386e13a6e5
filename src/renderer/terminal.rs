//! crossterm output: terminal setup, teardown and diffed frame flushes

use std::io::{self, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use super::grid::{Cell, Grid, compose};
use crate::assets::Rgb;
use crate::sim::Scene;

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Double-buffered terminal renderer
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// What is currently on screen
    back: Grid,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            back: Grid::new(0, 0),
            keyboard_enhanced: false,
        }
    }

    /// Whether the terminal reports key release events
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Raw mode, alternate screen, hidden cursor, key release reporting if supported
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, terminal::EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        self.keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
            && execute!(
                self.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        log::info!("Terminal ready (key release events: {})", self.keyboard_enhanced);
        Ok(())
    }

    /// Restore the terminal. Safe to call after a failed `init`.
    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Draw a scene at the current terminal size
    pub fn render(&mut self, scene: &Scene) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.draw(scene, cols as usize, rows as usize)
    }

    /// Draw a scene onto a grid of the given size, writing only changed cells
    pub fn draw(&mut self, scene: &Scene, cols: usize, rows: usize) -> io::Result<()> {
        if self.back.cols != cols || self.back.rows != rows {
            self.back = Grid::new(cols, rows);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
        }

        let front = compose(scene, cols, rows);
        self.flush_diff(&front)?;
        self.back = front;
        Ok(())
    }

    fn flush_diff(&mut self, front: &Grid) -> io::Result<()> {
        let mut last: Option<(usize, usize)> = None;
        let mut colors: Option<(Rgb, Rgb)> = None;

        for row in 0..front.rows {
            for col in 0..front.cols {
                let cell = front.get(col, row);
                if cell == self.back.get(col, row) {
                    continue;
                }

                if last != Some((col.wrapping_sub(1), row)) {
                    queue!(self.out, MoveTo(col as u16, row as u16))?;
                }
                if colors != Some((cell.fg, cell.bg)) {
                    queue!(
                        self.out,
                        SetForegroundColor(color(cell.fg)),
                        SetBackgroundColor(color(cell.bg))
                    )?;
                    colors = Some((cell.fg, cell.bg));
                }
                queue!(self.out, Print(cell.ch))?;
                last = Some((col, row));
            }
        }

        self.out.flush()
    }

    /// Writer access (tests inspect the emitted bytes)
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }
}
