use serde::{Deserialize, Serialize};

/// Countdown measured against the owning field's millisecond tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTimer {
    duration_ms: i64,
    start_tick: i64,
}

impl TickTimer {
    pub fn new(duration_ms: i64, now_tick: i64) -> Self {
        Self {
            duration_ms: duration_ms.max(0),
            start_tick: now_tick,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub fn start_tick(&self) -> i64 {
        self.start_tick
    }

    pub fn remaining(&self, now_tick: i64) -> i64 {
        (self.start_tick + self.duration_ms - now_tick).max(0)
    }

    pub fn expired(&self, now_tick: i64) -> bool {
        now_tick >= self.start_tick + self.duration_ms
    }

    pub fn reset(&mut self, now_tick: i64) {
        self.start_tick = now_tick;
    }
}
