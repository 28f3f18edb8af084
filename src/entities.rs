//! Game entities: the player, its projectiles and the enemies.
//!
//! Every `update` takes a `step` factor: the number of nominal 60 Hz frames
//! the update covers.  Speeds are expressed per nominal frame, so `step = 1.0`
//! moves an entity by exactly its speed.

use std::io;

use rand::Rng;

use crate::collision::{Bounds, Rect};
use crate::input::{Key, KeySet};
use crate::surface::{Font, ImageId, Surface};

/// Last index of the looping sprite animation shared by all sheets.
pub const MAX_FRAME: u32 = 37;

fn next_frame(frame: u32) -> u32 {
    if frame < MAX_FRAME {
        frame + 1
    } else {
        0
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

pub const PROJECTILE_WIDTH: f64 = 10.0;
pub const PROJECTILE_HEIGHT: f64 = 3.0;
pub const PROJECTILE_SPEED: f64 = 3.0;
/// Projectiles are dropped past this fraction of the playfield width.
pub const PROJECTILE_RANGE: f64 = 0.8;

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub marked_for_deletion: bool,
}

impl Projectile {
    pub fn new(x: f64, y: f64) -> Self {
        Projectile {
            x,
            y,
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self, step: f64, game_width: f64) {
        self.x += PROJECTILE_SPEED * step;
        if self.x > game_width * PROJECTILE_RANGE {
            self.marked_for_deletion = true;
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.draw_image(ImageId::Projectile, self.x, self.y)
    }
}

impl Bounds for Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f64 = 120.0;
pub const PLAYER_HEIGHT: f64 = 190.0;
pub const PLAYER_START: (f64, f64) = (20.0, 100.0);
pub const PLAYER_MAX_SPEED: f64 = 2.0;
/// Where a new projectile appears relative to the player's top-left corner.
pub const MUZZLE_OFFSET: (f64, f64) = (100.0, 30.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub speed_y: f64,
    pub frame_x: u32,
    pub frame_y: u32,
    pub projectiles: Vec<Projectile>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Player {
            x: PLAYER_START.0,
            y: PLAYER_START.1,
            speed_y: 0.0,
            frame_x: 0,
            frame_y: 0,
            projectiles: Vec::new(),
        }
    }

    /// Lowest and highest allowed `y`: half the sprite may leave the field.
    pub fn vertical_bounds(game_height: f64) -> (f64, f64) {
        (-PLAYER_HEIGHT * 0.5, game_height - PLAYER_HEIGHT * 0.5)
    }

    pub fn update(&mut self, step: f64, held: &KeySet, game_width: f64, game_height: f64) {
        self.speed_y = if held.contains(Key::Up) {
            -PLAYER_MAX_SPEED
        } else if held.contains(Key::Down) {
            PLAYER_MAX_SPEED
        } else {
            0.0
        };
        self.y += self.speed_y * step;

        let (top, bottom) = Self::vertical_bounds(game_height);
        self.y = self.y.clamp(top, bottom);

        for projectile in &mut self.projectiles {
            projectile.update(step, game_width);
        }
        self.projectiles.retain(|p| !p.marked_for_deletion);

        if step > 0.0 {
            self.frame_x = next_frame(self.frame_x);
        }
    }

    /// Fires one projectile if there is ammo left.  Returns whether it fired.
    pub fn shoot_top(&mut self, ammo: &mut u32) -> bool {
        if *ammo == 0 {
            return false;
        }
        self.projectiles.push(Projectile::new(
            self.x + MUZZLE_OFFSET.0,
            self.y + MUZZLE_OFFSET.1,
        ));
        *ammo -= 1;
        tracing::trace!(x = self.x, y = self.y, ammo = *ammo, "projectile fired");
        true
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, debug: bool) -> io::Result<()> {
        if debug {
            surface.stroke_rect(self.bounds())?;
        }
        let src = Rect::new(
            self.frame_x as f64 * PLAYER_WIDTH,
            self.frame_y as f64 * PLAYER_HEIGHT,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        );
        surface.draw_sub_image(ImageId::Player, src, self.bounds())?;
        for projectile in &self.projectiles {
            projectile.draw(surface)?;
        }
        Ok(())
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Range of the per-instance horizontal speed (always leftward).
pub const ENEMY_SPEED_RANGE: std::ops::Range<f64> = -3.0..-0.5;

/// Concrete enemy kinds.  They share one behaviour and differ only in how
/// they are built: sprite size, sheet, toughness and spawn distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Angler1,
}

impl EnemyKind {
    pub fn size(self) -> (f64, f64) {
        match self {
            EnemyKind::Angler1 => (228.0, 169.0),
        }
    }

    pub fn image(self) -> ImageId {
        match self {
            EnemyKind::Angler1 => ImageId::Angler1,
        }
    }

    pub fn lives(self) -> u32 {
        match self {
            EnemyKind::Angler1 => 5,
        }
    }

    /// Number of colour variants stacked vertically in the sprite sheet.
    pub fn sprite_rows(self) -> u32 {
        match self {
            EnemyKind::Angler1 => 3,
        }
    }

    /// Vertical spawn position for a playfield of `game_height`.
    fn spawn_y(self, game_height: f64, rng: &mut impl Rng) -> f64 {
        let (_, height) = self.size();
        match self {
            EnemyKind::Angler1 => rng.gen::<f64>() * (game_height * 0.9 - height),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed_x: f64,
    pub lives: u32,
    /// Points gained for the kill, or lost on contact with the player.
    pub score: i64,
    pub frame_x: u32,
    pub frame_y: u32,
    pub marked_for_deletion: bool,
}

impl Enemy {
    /// Builds an enemy of `kind` just beyond the right edge of the playfield.
    pub fn spawn(kind: EnemyKind, game_width: f64, game_height: f64, rng: &mut impl Rng) -> Self {
        let (width, height) = kind.size();
        let lives = kind.lives();
        let speed_x = rng.gen_range(ENEMY_SPEED_RANGE);
        let y = kind.spawn_y(game_height, rng);
        let frame_y = rng.gen_range(0..kind.sprite_rows());
        Enemy {
            kind,
            x: game_width,
            y,
            width,
            height,
            speed_x,
            lives,
            score: lives as i64,
            frame_x: 0,
            frame_y,
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self, step: f64) {
        self.x += self.speed_x * step;
        if self.x + self.width < 0.0 {
            self.marked_for_deletion = true;
        }
        if step > 0.0 {
            self.frame_x = next_frame(self.frame_x);
        }
    }

    /// Takes one point of damage.  Returns `true` once no lives remain.
    pub fn hit(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, debug: bool) -> io::Result<()> {
        if debug {
            surface.stroke_rect(self.bounds())?;
        }
        let src = Rect::new(
            self.frame_x as f64 * self.width,
            self.frame_y as f64 * self.height,
            self.width,
            self.height,
        );
        surface.draw_sub_image(self.kind.image(), src, self.bounds())?;
        if debug {
            surface.save();
            surface.set_font(Font::new(20.0, "Helvetica"));
            surface.fill_text(&self.lives.to_string(), self.x, self.y)?;
            surface.restore();
        }
        Ok(())
    }
}

impl Bounds for Enemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
