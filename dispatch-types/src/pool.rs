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

use std::collections::VecDeque;

use crate::Location;

/// Per-origin bookkeeping kept by the worker registry.
///
/// `queue` holds the locations still to be served from `subroute`, which is
/// in turn the contiguous slice of the current round's remainder assigned to
/// this origin by the subroute partitioner.
#[derive(Debug, Clone, Default)]
pub struct RoutePoolEntry {
    /// Monotonic seconds of the last dispatcher hit for this origin.
    pub last_access: f64,
    /// FIFO of locations yet to be served from this origin's subroute.
    pub queue: VecDeque<Location>,
    /// Ordered locations currently assigned to this origin.
    pub subroute: Vec<Location>,
}

impl RoutePoolEntry {
    /// Create a fresh entry with no subroute yet, timestamped `now`.
    pub fn new(now: f64) -> Self {
        Self {
            last_access: now,
            queue: VecDeque::new(),
            subroute: Vec::new(),
        }
    }
}
