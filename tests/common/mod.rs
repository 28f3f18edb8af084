#![allow(dead_code)]

use std::io;

use parallax_shooter::collision::Rect;
use parallax_shooter::compute::Game;
use parallax_shooter::config::GameConfig;
use parallax_shooter::entities::{Enemy, EnemyKind};
use parallax_shooter::surface::{ImageId, Style, StyleStack, Surface};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One call made against a [`RecordingSurface`], with the style in effect.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear(Rect),
    Image(ImageId, f64, f64),
    SubImage(ImageId, Rect, Rect),
    Text(String, f64, f64, Style),
    FillRect(Rect, Style),
    StrokeRect(Rect),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub styles: StyleStack,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text(t, ..) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fill_rects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect(..)))
            .count()
    }

    pub fn stroke_rects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::StrokeRect(..)))
            .count()
    }

    /// Image ids in the order they were drawn.
    pub fn images(&self) -> Vec<ImageId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image(id, ..) | DrawCall::SubImage(id, ..) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn styles(&mut self) -> &mut StyleStack {
        &mut self.styles
    }

    fn clear_rect(&mut self, rect: Rect) -> io::Result<()> {
        self.calls.push(DrawCall::Clear(rect));
        Ok(())
    }

    fn draw_image(&mut self, image: ImageId, x: f64, y: f64) -> io::Result<()> {
        self.calls.push(DrawCall::Image(image, x, y));
        Ok(())
    }

    fn draw_sub_image(&mut self, image: ImageId, src: Rect, dest: Rect) -> io::Result<()> {
        self.calls.push(DrawCall::SubImage(image, src, dest));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> io::Result<()> {
        let style = self.styles.current().clone();
        self.calls.push(DrawCall::Text(text.to_string(), x, y, style));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> io::Result<()> {
        let style = self.styles.current().clone();
        self.calls.push(DrawCall::FillRect(rect, style));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect) -> io::Result<()> {
        self.calls.push(DrawCall::StrokeRect(rect));
        Ok(())
    }
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn make_game() -> Game {
    Game::new(GameConfig::default())
}

/// An Angler1 parked at a known position with a known speed.
pub fn enemy_at(x: f64, y: f64, speed_x: f64) -> Enemy {
    let mut rng = seeded_rng();
    let mut enemy = Enemy::spawn(EnemyKind::Angler1, 1200.0, 500.0, &mut rng);
    enemy.x = x;
    enemy.y = y;
    enemy.speed_x = speed_x;
    enemy
}
