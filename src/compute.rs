//! Game state and the per-frame simulation step.
//!
//! `Game` exclusively owns every entity.  The frame driver calls
//! [`Game::update`] with the elapsed milliseconds, the frame's input
//! snapshot and an RNG handle, then [`Game::draw`].  Randomness only enters
//! through the injected RNG, so a seeded RNG makes a run reproducible.

use std::io;

use rand::Rng;

use crate::background::Background;
use crate::collision::{check_collision, Rect};
use crate::config::GameConfig;
use crate::entities::{Enemy, EnemyKind, Player};
use crate::input::{InputSnapshot, KeySet};
use crate::surface::Surface;
use crate::ui::Ui;

/// Duration of the frame all entity speeds are expressed against.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Longest stretch of motion a single update simulates.
pub const MAX_FRAME_MS: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Over,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    TimeLimit,
    WinningScore,
}

#[derive(Clone, Debug)]
pub struct Game {
    pub width: f64,
    pub height: f64,
    pub score: i64,
    pub winning_score: i64,
    pub game_time: f64,
    pub time_limit: f64,
    pub speed: f64,
    pub debug: bool,
    /// Direction keys held during the last update.
    pub keys: KeySet,
    pub ammo: u32,
    pub max_ammo: u32,
    pub ammo_timer: f64,
    pub ammo_interval: f64,
    pub enemy_timer: f64,
    pub enemy_interval: f64,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
    pub player: Player,
    pub background: Background,
    pub ui: Ui,
    pub enemies: Vec<Enemy>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        tracing::info!(
            width = config.width,
            height = config.height,
            winning_score = config.winning_score,
            time_limit_ms = config.time_limit,
            "game started"
        );
        Game {
            width: config.width,
            height: config.height,
            score: 0,
            winning_score: config.winning_score,
            game_time: 0.0,
            time_limit: config.time_limit,
            speed: config.speed,
            debug: config.debug,
            keys: KeySet::new(),
            ammo: config.initial_ammo.min(config.max_ammo),
            max_ammo: config.max_ammo,
            ammo_timer: 0.0,
            ammo_interval: config.ammo_interval,
            enemy_timer: 0.0,
            enemy_interval: config.enemy_interval,
            status: GameStatus::Playing,
            end_reason: None,
            player: Player::new(),
            background: Background::new(),
            ui: Ui::default(),
            enemies: Vec::new(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    pub fn has_won(&self) -> bool {
        self.score > self.winning_score
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// `Over` is terminal: later calls keep the first reason.
    fn finish(&mut self, reason: EndReason) {
        if self.is_over() {
            return;
        }
        self.status = GameStatus::Over;
        self.end_reason = Some(reason);
        tracing::info!(
            score = self.score,
            game_time_ms = self.game_time,
            reason = ?reason,
            won = self.has_won(),
            "game over"
        );
    }

    /// Fires from the player's position.  Does nothing without ammo.
    pub fn shoot_top(&mut self) -> bool {
        self.player.shoot_top(&mut self.ammo)
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
    }

    pub fn add_enemy(&mut self, rng: &mut impl Rng) {
        let enemy = Enemy::spawn(EnemyKind::Angler1, self.width, self.height, rng);
        tracing::debug!(kind = ?enemy.kind, y = enemy.y, speed_x = enemy.speed_x, "enemy spawned");
        self.enemies.push(enemy);
    }

    /// Applies the frame's one-shot actions and records the held keys.
    pub fn apply_input(&mut self, input: &InputSnapshot) {
        if input.debug_toggles % 2 == 1 {
            self.toggle_debug();
        }
        for _ in 0..input.shots {
            self.shoot_top();
        }
        self.keys = input.held.clone();
    }

    /// Advances the simulation by `dt` milliseconds.
    ///
    /// Motion and collisions run in sub-steps of at most one nominal frame, so
    /// a long frame cannot carry a projectile through an enemy.  Frames longer
    /// than [`MAX_FRAME_MS`] only simulate that much motion; the timers still
    /// see the full `dt`.
    pub fn update(&mut self, dt: f64, input: &InputSnapshot, rng: &mut impl Rng) {
        self.apply_input(input);

        if !self.is_over() {
            self.game_time += dt;
            if self.game_time > self.time_limit {
                self.finish(EndReason::TimeLimit);
            }
        }

        if self.ammo_timer > self.ammo_interval {
            if self.ammo < self.max_ammo {
                self.ammo += 1;
            }
            self.ammo_timer = 0.0;
        } else {
            self.ammo_timer += dt;
        }

        let mut remaining = dt.min(MAX_FRAME_MS) / NOMINAL_FRAME_MS;
        loop {
            let step = remaining.min(1.0);
            self.background.update(step, self.speed);
            self.background.foreground.update(step, self.speed);
            self.player.update(step, &self.keys, self.width, self.height);
            self.resolve_enemies(step);
            remaining -= step;
            if remaining <= 0.0 {
                break;
            }
        }

        if self.enemy_timer > self.enemy_interval && !self.is_over() {
            self.add_enemy(rng);
            self.enemy_timer = 0.0;
        } else {
            self.enemy_timer += dt;
        }
    }

    /// Moves every enemy, resolves its collisions, then sweeps the dead ones.
    /// Removal happens only after all enemies have been processed.
    fn resolve_enemies(&mut self, step: f64) {
        let mut enemies = std::mem::take(&mut self.enemies);

        for enemy in &mut enemies {
            enemy.update(step);

            if check_collision(&self.player, &*enemy) && !enemy.marked_for_deletion {
                enemy.marked_for_deletion = true;
                if !self.is_over() {
                    self.score -= enemy.score;
                }
            }

            let mut killed = false;
            for projectile in &mut self.player.projectiles {
                if check_collision(&*projectile, &*enemy) {
                    projectile.marked_for_deletion = true;
                    killed |= enemy.hit();
                }
            }
            if killed && !enemy.marked_for_deletion {
                enemy.marked_for_deletion = true;
                tracing::debug!(kind = ?enemy.kind, score = enemy.score, "enemy destroyed");
                self.award(enemy.score);
            }
        }

        enemies.retain(|e| !e.marked_for_deletion);
        self.enemies = enemies;
    }

    fn award(&mut self, points: i64) {
        if !self.is_over() {
            self.score += points;
        }
        if self.score > self.winning_score {
            self.finish(EndReason::WinningScore);
        }
    }

    /// Back layers, player, HUD, enemies, then the foreground over everything.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        self.background.draw(surface)?;
        self.player.draw(surface, self.debug)?;
        self.ui.draw(surface, self)?;
        for enemy in &self.enemies {
            enemy.draw(surface, self.debug)?;
        }
        self.background.foreground.draw(surface)
    }
}
