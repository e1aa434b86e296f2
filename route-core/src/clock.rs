// geodispatch: fair route dispatch over a geofenced coordinate pool
// Copyright (C) 2026 geodispatch Contributors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! A small seam over wall-clock time so dispatch decisions (due-at
//! comparisons, idle-reaper timeouts) can be driven deterministically in
//! tests instead of racing the real clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of monotonic-ish wall-clock seconds.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time, in seconds since the Unix epoch.
    fn now(&self) -> f64;
}

/// The real clock, backed by [`SystemTime`].
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs_f64()
    }
}

/// A clock whose reading is set explicitly by a test, stored as
/// milliseconds to stay representable in an atomic.
#[derive(Debug, Default)]
pub struct TestClock {
    millis: AtomicU64,
}

impl TestClock {
    /// Create a test clock starting at `now` seconds.
    pub fn new(now: f64) -> Self {
        let clock = Self::default();
        clock.set(now);
        clock
    }

    /// Overwrite the current reading.
    pub fn set(&self, now: f64) {
        self.millis.store((now * 1000.0) as u64, Ordering::SeqCst);
    }

    /// Advance the current reading by `delta` seconds.
    pub fn advance(&self, delta: f64) {
        self.set(self.now() + delta);
    }
}

impl Clock for TestClock {
    fn now(&self) -> f64 {
        self.millis.load(Ordering::SeqCst) as f64 / 1000.0
    }
}
