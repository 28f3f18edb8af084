//! Terminal rendering: the only place that talks to crossterm for output.
//!
//! `TerminalSurface` implements the core's drawing surface on a character
//! grid.  Playfield pixels are scaled onto the available cells, every image
//! is rendered as a coloured glyph pattern, and a whole frame is composed in
//! memory before being written out in one go.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use parallax_shooter::collision::Rect;
use parallax_shooter::surface::{ImageId, Rgb, StyleStack, Surface, TextAlign};
use parallax_shooter::{background, entities};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STARS: Color = Color::DarkGrey;
const C_HILLS: Color = Color::DarkBlue;
const C_GROUND: Color = Color::DarkGreen;
const C_FOREGROUND: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_PROJECTILE: Color = Color::Yellow;
const C_DEBUG_BOX: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const ANGLER_VARIANTS: [Color; 3] = [Color::Red, Color::Magenta, Color::Cyan];

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
};

/// Cheap deterministic hash used to scatter background glyphs.
fn noise(a: i64, b: i64) -> u64 {
    let mut h = (a as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (b as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 31;
    h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 29)
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

pub struct TerminalSurface {
    cols: u16,
    /// Rows available to the playfield; the last terminal row holds the hint.
    rows: u16,
    field_width: f64,
    field_height: f64,
    cells: Vec<Cell>,
    styles: StyleStack,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, field_width: f64, field_height: f64) -> Self {
        let mut surface = TerminalSurface {
            cols: 0,
            rows: 0,
            field_width,
            field_height,
            cells: Vec::new(),
            styles: StyleStack::default(),
        };
        // Terminal ink defaults to a light colour, not canvas black.
        surface.styles.current_mut().fill_color = Rgb::WHITE;
        surface.resize(cols, rows);
        surface
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.saturating_sub(1).max(1);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    fn px_per_col(&self) -> f64 {
        self.field_width / self.cols as f64
    }

    fn px_per_row(&self) -> f64 {
        self.field_height / self.rows as f64
    }

    fn to_col(&self, x: f64) -> i32 {
        (x / self.px_per_col()).floor() as i32
    }

    fn to_row(&self, y: f64) -> i32 {
        (y / self.px_per_row()).floor() as i32
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = Cell { ch, fg };
    }

    /// Cell range covered by `rect`; at least one cell for tiny rectangles.
    fn cell_span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let c0 = self.to_col(rect.x);
        let r0 = self.to_row(rect.y);
        let c1 = self.to_col(rect.x + rect.width).max(c0 + 1);
        let r1 = self.to_row(rect.y + rect.height).max(r0 + 1);
        (c0, r0, c1, r1)
    }

    fn fill_cells(&mut self, rect: Rect, ch: char, fg: Color) {
        let (c0, r0, c1, r1) = self.cell_span(rect);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, ch, fg);
            }
        }
    }

    /// Renders one copy of a parallax layer whose left edge is at `x`.
    fn draw_layer(&mut self, image: ImageId, x: f64) {
        let px_col = self.px_per_col();
        let rows = self.rows as i32;
        for col in 0..self.cols as i32 {
            let local = (col as f64 + 0.5) * px_col - x;
            if local < 0.0 || local >= background::LAYER_WIDTH {
                continue;
            }
            let lc = (local / px_col) as i64;
            for row in 0..rows {
                let depth = row as f64 / rows as f64;
                let glyph = match image {
                    ImageId::Layer1 if depth < 0.6 && noise(lc, row as i64) % 23 == 0 => {
                        Some(('.', C_STARS))
                    }
                    ImageId::Layer2 => {
                        let ridge = 0.62 + 0.08 * ((lc as f64) * 0.21).sin();
                        (depth >= ridge && depth < 0.85).then_some(('░', C_HILLS))
                    }
                    ImageId::Layer3 if depth >= 0.85 => Some(('▒', C_GROUND)),
                    ImageId::Layer4 if row == rows - 1 && noise(lc, 7) % 3 != 0 => {
                        Some(('▓', C_FOREGROUND))
                    }
                    _ => None,
                };
                if let Some((ch, fg)) = glyph {
                    self.put(col, row, ch, fg);
                }
            }
        }
    }

    /// Writes the composed frame and a hint line below it.
    pub fn present<W: Write>(&self, out: &mut W, hint: &str) -> io::Result<()> {
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let line = &self.cells[row as usize * self.cols as usize..][..self.cols as usize];
            let mut current = None;
            let mut run = String::with_capacity(line.len());
            for cell in line {
                if current != Some(cell.fg) {
                    if !run.is_empty() {
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    current = Some(cell.fg);
                }
                run.push(cell.ch);
            }
            out.queue(Print(&run))?;
        }

        out.queue(cursor::MoveTo(0, self.rows))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        let hint: String = hint.chars().take(self.cols as usize).collect();
        out.queue(Print(format!("{:<width$}", hint, width = self.cols as usize)))?;

        out.queue(style::ResetColor)?;
        out.flush()
    }
}

impl Surface for TerminalSurface {
    fn styles(&mut self) -> &mut StyleStack {
        &mut self.styles
    }

    fn clear_rect(&mut self, rect: Rect) -> io::Result<()> {
        self.fill_cells(rect, BLANK.ch, BLANK.fg);
        Ok(())
    }

    fn draw_image(&mut self, image: ImageId, x: f64, y: f64) -> io::Result<()> {
        match image {
            ImageId::Layer1 | ImageId::Layer2 | ImageId::Layer3 | ImageId::Layer4 => {
                self.draw_layer(image, x)
            }
            ImageId::Projectile => {
                let rect = Rect::new(
                    x,
                    y,
                    entities::PROJECTILE_WIDTH,
                    entities::PROJECTILE_HEIGHT,
                );
                self.fill_cells(rect, '━', C_PROJECTILE);
            }
            ImageId::Player => {
                let rect = Rect::new(x, y, entities::PLAYER_WIDTH, entities::PLAYER_HEIGHT);
                self.fill_cells(rect, '▒', C_PLAYER);
            }
            ImageId::Angler1 => {
                let (w, h) = entities::EnemyKind::Angler1.size();
                self.fill_cells(Rect::new(x, y, w, h), '▓', ANGLER_VARIANTS[0]);
            }
        }
        Ok(())
    }

    fn draw_sub_image(&mut self, image: ImageId, src: Rect, dest: Rect) -> io::Result<()> {
        // Alternate glyphs with the animation frame so sprites visibly flap.
        let frame = if src.width > 0.0 { (src.x / src.width) as u32 } else { 0 };
        let ch = if frame % 8 < 4 { '▓' } else { '▒' };
        match image {
            ImageId::Player => self.fill_cells(dest, ch, C_PLAYER),
            ImageId::Angler1 => {
                let variant = if src.height > 0.0 { (src.y / src.height) as usize } else { 0 };
                let fg = ANGLER_VARIANTS[variant.min(ANGLER_VARIANTS.len() - 1)];
                self.fill_cells(dest, ch, fg);
            }
            other => return self.draw_image(other, dest.x, dest.y),
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> io::Result<()> {
        let style = self.styles.current();
        let fg = to_color(style.fill_color);
        let len = text.chars().count() as i32;
        let mut col = self.to_col(x);
        if style.text_align == TextAlign::Center {
            col -= len / 2;
        }
        // Canvas text sits on its baseline; draw on the row just above it.
        let row = (self.to_row(y) - 1).max(0);
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> io::Result<()> {
        let fg = to_color(self.styles.current().fill_color);
        self.fill_cells(rect, '█', fg);
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect) -> io::Result<()> {
        let (c0, r0, c1, r1) = self.cell_span(rect);
        let (right, bottom) = (c1 - 1, r1 - 1);
        for col in c0..=right {
            self.put(col, r0, '─', C_DEBUG_BOX);
            self.put(col, bottom, '─', C_DEBUG_BOX);
        }
        for row in r0..=bottom {
            self.put(c0, row, '│', C_DEBUG_BOX);
            self.put(right, row, '│', C_DEBUG_BOX);
        }
        self.put(c0, r0, '┌', C_DEBUG_BOX);
        self.put(right, r0, '┐', C_DEBUG_BOX);
        self.put(c0, bottom, '└', C_DEBUG_BOX);
        self.put(right, bottom, '┘', C_DEBUG_BOX);
        Ok(())
    }
}
