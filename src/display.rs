//! Rendering layer.
//!
//! Entities draw into a [`Surface`]; the game only ever talks to that trait.
//! [`FrameBuffer`] is the in-memory surface used for every frame, and
//! [`present`] is the single place where cells turn into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_ISSUE: Color = Color::White;
pub const C_BURST: Color = Color::Yellow;
pub const C_BIG_BURST: Color = Color::Rgb { r: 255, g: 105, b: 180 };
pub const C_LAUNCHER: Color = Color::Rgb { r: 128, g: 0, b: 128 };
pub const C_SCORE: Color = Color::Rgb { r: 255, g: 215, b: 0 };
pub const C_COUNTER_BG: Color = Color::Rgb { r: 100, g: 149, b: 237 };
pub const C_LOG_FG: Color = Color::Black;
pub const C_LOG_BG: Color = Color::White;
pub const C_TITLE_FG: Color = Color::Black;
pub const C_TITLE_BG: Color = Color::Rgb { r: 100, g: 149, b: 237 };

/// Shot colours, cycled one step per shot.
pub const RAINBOW: [Color; 7] = [
    Color::Rgb { r: 255, g: 0, b: 0 },
    Color::Rgb { r: 255, g: 165, b: 0 },
    Color::Rgb { r: 255, g: 255, b: 0 },
    Color::Rgb { r: 0, g: 128, b: 0 },
    Color::Rgb { r: 0, g: 0, b: 255 },
    Color::Rgb { r: 75, g: 0, b: 130 },
    Color::Rgb { r: 128, g: 0, b: 128 },
];

// ── Style ─────────────────────────────────────────────────────────────────────

/// Foreground/background pair. `None` leaves the terminal default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Style {
    pub fn foreground(self, color: Color) -> Self {
        Self {
            fg: Some(color),
            ..self
        }
    }

    pub fn background(self, color: Color) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    /// Lay `over` on top of `self`: colours `over` leaves unset are kept.
    pub fn patch(self, over: Style) -> Self {
        Self {
            fg: over.fg.or(self.fg),
            bg: over.bg.or(self.bg),
        }
    }
}

// ── Surfaces ──────────────────────────────────────────────────────────────────

/// Character-cell drawing target.
pub trait Surface {
    /// Width and height in cells.
    fn size(&self) -> (i32, i32);

    /// Set one cell. Coordinates outside the surface are ignored.
    fn set_content(&mut self, x: i32, y: i32, ch: char, combining: Option<char>, style: Style);

    fn clear(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub combining: Option<char>,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            combining: None,
            style: Style::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    /// Resize and blank the buffer.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// The characters of row `y` with trailing blanks removed.
    pub fn row_text(&self, y: i32) -> String {
        let text: String = (0..self.width as i32)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.ch)
            .collect();
        text.trim_end().to_string()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Surface for FrameBuffer {
    fn size(&self) -> (i32, i32) {
        (self.width as i32, self.height as i32)
    }

    fn set_content(&mut self, x: i32, y: i32, ch: char, combining: Option<char>, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell {
                ch,
                combining,
                style,
            };
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

/// Draw `text` left to right starting at `(x, y)`.
///
/// Zero-width characters get a blank cell of their own and ride along as a
/// combining mark, so they never collapse into the previous cell.
pub fn draw_str(surface: &mut dyn Surface, x: i32, y: i32, style: Style, text: &str) {
    let mut x = x;
    for c in text.chars() {
        let (ch, combining, width) = match c.width() {
            Some(0) => (' ', Some(c), 1),
            Some(w) => (c, None, w as i32),
            // control characters
            None => (' ', None, 1),
        };
        surface.set_content(x, y, ch, combining, style);
        x += width;
    }
}

/// Full-width bar across the top row.
pub fn draw_title(surface: &mut dyn Surface, text: &str) {
    let style = Style::default()
        .foreground(C_TITLE_FG)
        .background(C_TITLE_BG);
    let (width, _) = surface.size();
    for x in 0..width {
        surface.set_content(x, 0, ' ', None, style);
    }
    draw_str(surface, 1, 0, style, text);
}

// ── Terminal output ───────────────────────────────────────────────────────────

/// Write the whole frame to the terminal and flush.
pub fn present<W: Write>(out: &mut W, frame: &FrameBuffer) -> std::io::Result<()> {
    let mut current: Option<Style> = None;

    for y in 0..frame.height() {
        out.queue(cursor::MoveTo(0, y))?;
        let mut x = 0i32;
        while x < frame.width() as i32 {
            let Some(cell) = frame.cell(x, y as i32) else {
                break;
            };
            if current != Some(cell.style) {
                apply_style(out, cell.style)?;
                current = Some(cell.style);
            }
            let mut glyph = String::with_capacity(2);
            glyph.push(cell.ch);
            if let Some(mark) = cell.combining {
                glyph.push(mark);
            }
            out.queue(Print(glyph))?;
            // wide glyphs already cover the next cell
            x += cell.ch.width().unwrap_or(1).max(1) as i32;
        }
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

fn apply_style<W: Write>(out: &mut W, s: Style) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    if let Some(fg) = s.fg {
        out.queue(style::SetForegroundColor(fg))?;
    }
    if let Some(bg) = s.bg {
        out.queue(style::SetBackgroundColor(bg))?;
    }
    Ok(())
}
