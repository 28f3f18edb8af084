//! Heads-up display: score, ammo gauge, timer and the end-of-game banner.

use std::io;

use crate::collision::Rect;
use crate::compute::Game;
use crate::surface::{Font, Rgb, Surface, TextAlign};

pub const WIN_MESSAGE: (&str, &str) = ("You Win!", "Well done!");
pub const LOSE_MESSAGE: (&str, &str) = ("You Lost!", "Try again next time!");

#[derive(Clone, Debug, PartialEq)]
pub struct Ui {
    pub font_size: f64,
    pub font_family: String,
    pub color: Rgb,
}

impl Default for Ui {
    fn default() -> Self {
        Ui {
            font_size: 25.0,
            font_family: "Chelsea Market".to_string(),
            color: Rgb::WHITE,
        }
    }
}

impl Ui {
    /// Headline and subline for a finished game.
    pub fn banner(game: &Game) -> (&'static str, &'static str) {
        if game.has_won() {
            WIN_MESSAGE
        } else {
            LOSE_MESSAGE
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, game: &Game) -> io::Result<()> {
        surface.save();
        let result = self.draw_hud(surface, game);
        surface.restore();
        result
    }

    fn draw_hud<S: Surface + ?Sized>(&self, surface: &mut S, game: &Game) -> io::Result<()> {
        surface.set_fill_color(self.color);
        surface.set_shadow(2.0, 2.0, Rgb::BLACK);
        surface.set_font(Font::new(self.font_size, &self.font_family));

        surface.fill_text(&format!("Score: {}", game.score), 20.0, 40.0)?;

        for i in 0..game.ammo {
            surface.fill_rect(Rect::new(5.0 * i as f64, 50.0, 3.0, 20.0))?;
        }

        let seconds = game.game_time * 0.001;
        surface.fill_text(&format!("Timer: {:.1}", seconds), 20.0, 100.0)?;

        if game.is_over() {
            let (headline, subline) = Self::banner(game);
            surface.set_text_align(TextAlign::Center);
            surface.set_font(Font::new(50.0, &self.font_family));
            surface.fill_text(headline, game.width * 0.5, game.height * 0.5)?;
            surface.set_font(Font::new(25.0, &self.font_family));
            surface.fill_text(subline, game.width * 0.5, game.height * 0.4)?;
        }
        Ok(())
    }
}
