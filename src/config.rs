//! Tunables for a single game instance.  Times are in milliseconds.

pub const DEFAULT_WIDTH: f64 = 1200.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: f64,
    pub height: f64,
    pub winning_score: i64,
    pub time_limit: f64,
    /// Global scroll speed shared by every background layer.
    pub speed: f64,
    pub debug: bool,
    pub initial_ammo: u32,
    pub max_ammo: u32,
    pub ammo_interval: f64,
    pub enemy_interval: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            winning_score: 100,
            time_limit: 600_000.0,
            speed: 1.0,
            debug: true,
            initial_ammo: 20,
            max_ammo: 50,
            ammo_interval: 200.0,
            enemy_interval: 1000.0,
        }
    }
}

impl GameConfig {
    pub fn with_debug(self, debug: bool) -> Self {
        GameConfig { debug, ..self }
    }
}
