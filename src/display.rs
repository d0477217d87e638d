/// Terminal canvas. All terminal I/O lives here.
///
/// The world (1200×800 by default) is scaled onto the character grid. Each
/// frame is rasterised into a cell buffer and written out row by row on
/// `present`, so a frame is one burst of output instead of many cursor
/// jumps.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Print},
    QueueableCommand,
};
use tankz::entities::{Body, Point};
use tankz::render::{Canvas, Color, RenderError, Sprite};

const FILL: char = '█';
const TANK: char = '▆';
const SHELL: char = '●';

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::White,
};

pub struct TerminalCanvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    world_width: f32,
    world_height: f32,
    cells: Vec<Cell>,
}

/// The terminal background is dark, so the light and dark roles swap:
/// the game's white background is the terminal's own, and black ink
/// becomes white.
fn terminal_color(color: Color) -> style::Color {
    match color {
        Color::Blue => style::Color::Blue,
        Color::Red => style::Color::Red,
        Color::White => style::Color::Reset,
        Color::Green => style::Color::Green,
        Color::DarkGreen => style::Color::DarkGreen,
        Color::Yellow => style::Color::Yellow,
        Color::Orange => style::Color::DarkYellow,
        Color::Grey => style::Color::DarkGrey,
        Color::Black => style::Color::White,
    }
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        Self {
            out,
            cols,
            rows,
            world_width,
            world_height,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![BLANK; cols as usize * rows as usize];
    }

    /// World coordinates of a cell's centre.
    pub fn to_world(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.world_width / self.cols.max(1) as f32,
            (row as f32 + 0.5) * self.world_height / self.rows.max(1) as f32,
        )
    }

    fn col_of(&self, x: f32) -> i32 {
        (x * self.cols as f32 / self.world_width).floor() as i32
    }

    fn row_of(&self, y: f32) -> i32 {
        (y * self.rows as f32 / self.world_height).floor() as i32
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = cell;
    }

    fn fill_cells(&mut self, rect: Body, cell: Cell) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let (c0, r0) = (self.col_of(rect.x), self.row_of(rect.y));
        // At least one cell, even for shapes thinner than a cell.
        let c1 = self.col_of(rect.x + rect.width).max(c0 + 1);
        let r1 = self.row_of(rect.y + rect.height).max(r0 + 1);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, cell);
            }
        }
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.cells.fill(Cell { glyph: ' ', color });
        Ok(())
    }

    /// Scanline fill sampled at each row's centre, even-odd rule.
    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), RenderError> {
        if points.len() < 3 {
            return Ok(());
        }
        let cell = Cell { glyph: FILL, color };
        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for row in 0..self.rows as i32 {
            let y = (row as f32 + 0.5) * self.world_height / self.rows as f32;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y > y) != (b.y > y) {
                    crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                for col in self.col_of(span[0])..=self.col_of(span[1]) {
                    self.put(col, row, cell);
                }
            }
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Body, color: Color) -> Result<(), RenderError> {
        self.fill_cells(rect, Cell { glyph: FILL, color });
        Ok(())
    }

    fn draw_sprite(&mut self, sprite: Sprite, bounds: Body, angle: f32) -> Result<(), RenderError> {
        match sprite {
            Sprite::Tank => self.fill_cells(bounds, Cell { glyph: TANK, color: Color::Blue }),
            Sprite::Projectile => {
                let c = bounds.center();
                let cell = Cell { glyph: SHELL, color: Color::Orange };
                self.put(self.col_of(c.x), self.row_of(c.y), cell);
            }
            Sprite::Cannon => {
                // Barrel from the pivot out to the muzzle; positive angles lean left.
                let glyph = match angle {
                    a if a.abs() > 67.5 => '─',
                    a if a > 22.5 => '\\',
                    a if a < -22.5 => '/',
                    _ => '│',
                };
                let cell = Cell { glyph, color: Color::Black };
                let c = bounds.center();
                let length = bounds.width.hypot(bounds.height) / 2.0;
                let (sin, cos) = angle.to_radians().sin_cos();
                let step = (self.world_height / self.rows.max(1) as f32).min(
                    self.world_width / self.cols.max(1) as f32,
                ) / 2.0;
                let mut travelled = 0.0;
                while travelled <= length {
                    let x = c.x - sin * travelled;
                    let y = c.y - cos * travelled;
                    self.put(self.col_of(x), self.row_of(y), cell);
                    travelled += step.max(1.0);
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) -> Result<(), RenderError> {
        let row = self.row_of(y);
        let col = self.col_of(x);
        for (i, glyph) in text.chars().enumerate() {
            self.put(col + i as i32, row, Cell { glyph, color });
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let cols = self.cols as usize;
        let mut run = String::with_capacity(cols);
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let line = &self.cells[row as usize * cols..(row as usize + 1) * cols];
            let mut current: Option<Color> = None;
            for cell in line {
                if current != Some(cell.color) {
                    if let Some(color) = current {
                        self.out.queue(style::SetForegroundColor(terminal_color(color)))?;
                        self.out.queue(Print(&run))?;
                        run.clear();
                    }
                    current = Some(cell.color);
                }
                run.push(cell.glyph);
            }
            if let Some(color) = current {
                self.out.queue(style::SetForegroundColor(terminal_color(color)))?;
                self.out.queue(Print(&run))?;
                run.clear();
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}
