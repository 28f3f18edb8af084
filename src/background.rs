//! Parallax scrolling background.

use std::io;

use crate::surface::{ImageId, Surface};

pub const LAYER_WIDTH: f64 = 1768.0;
pub const LAYER_HEIGHT: f64 = 500.0;

/// A horizontally wrapping image strip scrolled at a fraction of the game speed.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub image: ImageId,
    pub speed_modifier: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Layer {
    pub fn new(image: ImageId, speed_modifier: f64) -> Self {
        Layer {
            image,
            speed_modifier,
            x: 0.0,
            y: 0.0,
            width: LAYER_WIDTH,
            height: LAYER_HEIGHT,
        }
    }

    pub fn update(&mut self, step: f64, game_speed: f64) {
        if self.x <= -self.width {
            self.x = 0.0;
        }
        self.x -= game_speed * self.speed_modifier * step;
    }

    /// The second copy fills the gap the first leaves as it scrolls out.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.draw_image(self.image, self.x, self.y)?;
        surface.draw_image(self.image, self.x + self.width, self.y)
    }
}

/// Three back layers scrolled together, plus a fast foreground layer the
/// game drives on its own so it can be composited over the entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub layers: [Layer; 3],
    pub foreground: Layer,
}

impl Default for Background {
    fn default() -> Self {
        Self::new()
    }
}

impl Background {
    pub fn new() -> Self {
        Background {
            layers: [
                Layer::new(ImageId::Layer1, 0.3),
                Layer::new(ImageId::Layer2, 0.6),
                Layer::new(ImageId::Layer3, 1.0),
            ],
            foreground: Layer::new(ImageId::Layer4, 2.0),
        }
    }

    /// Scrolls the back layers only.
    pub fn update(&mut self, step: f64, game_speed: f64) {
        for layer in &mut self.layers {
            layer.update(step, game_speed);
        }
    }

    /// Draws the back layers only.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        for layer in &self.layers {
            layer.draw(surface)?;
        }
        Ok(())
    }
}
