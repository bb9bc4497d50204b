//! Elapsed-time clock
//!
//! A cancellable once-per-second task. The host feeds it frame deltas;
//! it reports how many whole seconds elapsed while it was running.

use crate::consts::TICK_SECONDS;

#[derive(Debug, Clone, Default)]
pub struct ElapsedClock {
    running: bool,
    accumulator: f64,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) counting from a fresh second
    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    /// Cancel; partial seconds are discarded
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed `dt` seconds of real time, returning whole ticks that fell due
    pub fn advance(&mut self, dt: f64) -> u32 {
        if !self.running || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let mut ticks = 0;
        while self.accumulator >= TICK_SECONDS {
            self.accumulator -= TICK_SECONDS;
            ticks += 1;
        }
        ticks
    }
}
