/// Turns the frame driver's monotonically increasing timestamps (ms) into
/// per-frame deltas.  The first delta is measured from time zero.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the milliseconds elapsed since the previous tick.  A timestamp
    /// that goes backwards yields zero rather than a negative delta.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let dt = (timestamp_ms - self.last).max(0.0);
        self.last = self.last.max(timestamp_ms);
        dt
    }

    pub fn last(&self) -> f64 {
        self.last
    }
}
