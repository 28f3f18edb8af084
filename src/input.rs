//! Keyboard state consumed by the simulation.
//!
//! Platform events are folded into an [`InputState`] as they arrive; once per
//! frame the driver takes an [`InputSnapshot`] and hands it to
//! `Game::update`.  Held direction keys persist across snapshots, one-shot
//! actions (fire, debug toggle) are drained by each snapshot.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
}

/// Held keys in press order, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<Key>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pressing an already-held key changes nothing.
    pub fn press(&mut self, key: Key) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Removes the key if held; releasing an untracked key is a no-op.
    pub fn release(&mut self, key: Key) {
        if let Some(pos) = self.keys.iter().position(|&k| k == key) {
            self.keys.remove(pos);
        }
    }

    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }
}

/// What the simulation sees for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub held: KeySet,
    /// Fire presses since the previous snapshot.
    pub shots: u32,
    /// Debug-overlay toggles since the previous snapshot.
    pub debug_toggles: u32,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn holding(key: Key) -> Self {
        let mut held = KeySet::new();
        held.press(key);
        InputSnapshot {
            held,
            ..Self::default()
        }
    }

    pub fn firing(shots: u32) -> Self {
        InputSnapshot {
            shots,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: KeySet,
    pending_shots: u32,
    pending_toggles: u32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.press(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.release(key);
    }

    pub fn fire(&mut self) {
        self.pending_shots = self.pending_shots.saturating_add(1);
    }

    pub fn toggle_debug(&mut self) {
        self.pending_toggles = self.pending_toggles.saturating_add(1);
    }

    /// Captures the held keys and drains queued one-shot actions.
    pub fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            held: self.held.clone(),
            shots: std::mem::take(&mut self.pending_shots),
            debug_toggles: std::mem::take(&mut self.pending_toggles),
        }
    }

    /// Forget everything, e.g. when a new game starts.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Release timing for terminals that never report key releases.
///
/// Each press or auto-repeat refreshes the key; a key not refreshed within
/// `window` counts as released.  The window is wall-clock time, independent
/// of the frame rate.
#[derive(Clone, Debug)]
pub struct HoldTracker {
    window: Duration,
    last_seen: HashMap<Key, Instant>,
}

impl HoldTracker {
    pub fn new(window: Duration) -> Self {
        HoldTracker {
            window,
            last_seen: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn seen(&mut self, key: Key, at: Instant) {
        self.last_seen.insert(key, at);
    }

    /// Stops tracking a key after an explicit release.
    pub fn forget(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn is_tracked(&self, key: Key) -> bool {
        self.last_seen.contains_key(&key)
    }

    /// Drops and returns every key last seen more than `window` before `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<Key> {
        let window = self.window;
        let mut expired = Vec::new();
        self.last_seen.retain(|&key, &mut last| {
            let live = now.saturating_duration_since(last) <= window;
            if !live {
                expired.push(key);
            }
            live
        });
        expired
    }
}
