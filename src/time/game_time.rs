use serde::{Deserialize, Serialize};

/// Monotonic game clock in milliseconds
///
/// Advanced by frame deltas. Pausing stops advancement without resetting the
/// clock; `time_scale` speeds up or slows down game time relative to frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTime {
    /// Milliseconds of game time since the clock started
    elapsed_ms: u64,
    /// Sub-millisecond remainder carried between frames
    #[serde(skip)]
    remainder_ms: f64,
    /// Game seconds per real second
    pub time_scale: f32,
    pub paused: bool,
}

impl GameTime {
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            remainder_ms: 0.0,
            time_scale: 1.0,
            paused: false,
        }
    }

    /// Start the clock at a given game time
    pub fn starting_at(elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            ..Self::new()
        }
    }

    /// Current game time in milliseconds
    pub fn game_time_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Advance by a frame delta in seconds
    ///
    /// Negative or non-finite deltas are ignored so the clock never runs backwards.
    pub fn advance(&mut self, delta_seconds: f32) {
        if self.paused || !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return;
        }
        let scaled_seconds = delta_seconds as f64 * self.time_scale.max(0.0) as f64;
        let total = self.remainder_ms + scaled_seconds * 1000.0;
        let whole = total.floor();
        self.elapsed_ms += whole as u64;
        self.remainder_ms = total - whole;
    }

    /// Milliseconds elapsed since `timestamp_ms`, negative if it is in the future
    pub fn elapsed_since(&self, timestamp_ms: u64) -> i64 {
        self.elapsed_ms as i64 - timestamp_ms as i64
    }
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new()
    }
}
