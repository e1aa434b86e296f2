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

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::Location;

/// A time-urgent visit that may preempt the normal route.
///
/// Ordered by `due_at` ascending; ties are broken by insertion order via
/// [`PriorityEvent::seq`], which is irrelevant to correctness (only a stable
/// pop order matters, not a specific tie-break rule) but keeps the heap's
/// iteration order deterministic for tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityEvent {
    /// Seconds-since-epoch at which this event becomes (or became) due.
    pub due_at: f64,
    /// Where the event should be served.
    pub location: Location,
    /// Monotonic insertion counter, used only to break ties in [`Ord`].
    #[serde(default)]
    pub seq: u64,
}

impl PriorityEvent {
    /// Create a new priority event with the given sequence number.
    pub fn new(due_at: f64, location: Location, seq: u64) -> Self {
        Self {
            due_at,
            location,
            seq,
        }
    }

    fn key(&self) -> (NotNan<f64>, u64) {
        (NotNan::new(self.due_at).unwrap_or(NotNan::new(f64::INFINITY).unwrap()), self.seq)
    }
}

impl Eq for PriorityEvent {}

impl PartialOrd for PriorityEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn orders_by_due_at() {
        let a = PriorityEvent::new(1.0, Location::new(0.0, 0.0), 0);
        let b = PriorityEvent::new(2.0, Location::new(0.0, 0.0), 1);
        assert!(a < b);
    }

    #[test]
    fn ties_broken_by_seq() {
        let a = PriorityEvent::new(1.0, Location::new(0.0, 0.0), 0);
        let b = PriorityEvent::new(1.0, Location::new(1.0, 1.0), 1);
        assert!(a < b);
    }
}
