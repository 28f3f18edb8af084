//! The 2D drawing surface every renderer targets.
//!
//! Coordinates are playfield pixels.  Implementations decide how images are
//! actually resolved; the core only refers to them by [`ImageId`].

use std::io;

use crate::collision::Rect;

/// Named image assets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageId {
    /// Player sprite sheet (one row, 38 frames).
    Player,
    Projectile,
    /// Angler1 sprite sheet (three colour rows, 38 frames).
    Angler1,
    Layer1,
    Layer2,
    Layer3,
    Layer4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub size_px: f64,
    pub family: String,
}

impl Font {
    pub fn new(size_px: f64, family: &str) -> Self {
        Font {
            size_px,
            family: family.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Drawing attributes that persist between calls until changed.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub fill_color: Rgb,
    pub shadow_offset: (f64, f64),
    pub shadow_color: Rgb,
    pub font: Font,
    pub text_align: TextAlign,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            fill_color: Rgb::BLACK,
            shadow_offset: (0.0, 0.0),
            shadow_color: Rgb::BLACK,
            font: Font::new(10.0, "sans-serif"),
            text_align: TextAlign::Left,
        }
    }
}

/// Current style plus the stack of saved ones.
#[derive(Clone, Debug, Default)]
pub struct StyleStack {
    current: Style,
    saved: Vec<Style>,
}

impl StyleStack {
    pub fn current(&self) -> &Style {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Style {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Restoring with nothing saved leaves the current style alone.
    pub fn restore(&mut self) {
        if let Some(style) = self.saved.pop() {
            self.current = style;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

pub trait Surface {
    fn styles(&mut self) -> &mut StyleStack;

    fn clear_rect(&mut self, rect: Rect) -> io::Result<()>;

    /// Draw the whole image with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: ImageId, x: f64, y: f64) -> io::Result<()>;

    /// Draw the `src` region of a sprite sheet into `dest`.
    fn draw_sub_image(&mut self, image: ImageId, src: Rect, dest: Rect) -> io::Result<()>;

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> io::Result<()>;

    fn fill_rect(&mut self, rect: Rect) -> io::Result<()>;

    fn stroke_rect(&mut self, rect: Rect) -> io::Result<()>;

    fn save(&mut self) {
        self.styles().save();
    }

    fn restore(&mut self) {
        self.styles().restore();
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.styles().current_mut().fill_color = color;
    }

    fn set_shadow(&mut self, offset_x: f64, offset_y: f64, color: Rgb) {
        let style = self.styles().current_mut();
        style.shadow_offset = (offset_x, offset_y);
        style.shadow_color = color;
    }

    fn set_font(&mut self, font: Font) {
        self.styles().current_mut().font = font;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.styles().current_mut().text_align = align;
    }
}
