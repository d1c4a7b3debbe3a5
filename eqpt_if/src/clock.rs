//! # Clock interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::{Duration, Instant}};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Monotonic time source with blocking delays.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed epoch. Never decreases.
    fn now_ms(&self) -> u64;

    /// Block for the given number of milliseconds.
    fn delay_ms(&mut self, ms: u64);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// [`Clock`] backed by the system's monotonic clock, where delays sleep the calling thread.
#[derive(Debug, Clone, Copy)]
pub struct SysClock {
    epoch: Instant
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SysClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now()
        }
    }
}

impl Default for SysClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SysClock {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn delay_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms))
    }
}
