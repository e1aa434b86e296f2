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

//! The two pieces of state guarded by `RouteManager`'s locks.

use std::collections::{BinaryHeap, HashMap, HashSet};

use dispatch_types::{Location, PriorityEvent, RoutePoolEntry};

/// Whether the most recent dispatch to an origin came from the route or the
/// priority overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionType {
    /// Came from the normal route.
    Normal = 0,
    /// Came from the priority heap.
    Priority = 1,
}

/// Everything guarded by the manager lock: route, remainder, priority heap,
/// per-origin pools, and the lifecycle flags that gate them.
#[derive(Debug, Default)]
pub struct ManagerState {
    /// Source coordinate pool; cleared while init coordinates are being
    /// replaced.
    pub coords_raw: Option<Vec<Location>>,
    /// The canonical cyclic traversal.
    pub route: Vec<Location>,
    /// Locations not yet served in the current round.
    pub current_round_remainder: Vec<Location>,
    /// Min-heap of priority events, ordered by `due_at`.
    pub prio_heap: BinaryHeap<std::cmp::Reverse<PriorityEvent>>,
    /// Whether a priority overlay is in use at all (distinct from "heap is
    /// momentarily empty").
    pub has_priority_overlay: bool,
    /// Per-origin access bookkeeping and assigned subroute.
    pub routepool: HashMap<String, RoutePoolEntry>,
    /// Insertion order of `routepool` entries (a `HashMap` has none of its
    /// own); the partitioner assigns slices in this order, mirroring the
    /// dict-insertion-order iteration the partitioner relies on.
    pub routepool_order: Vec<String>,
    /// Whether the most recent dispatch to an origin was a priority event.
    pub last_round_prio: HashMap<String, bool>,
    /// Whether the most recent dispatch to an origin was normal or priority.
    pub position_type: HashMap<String, PositionType>,
    /// Locations that are permanently skipped at the pre-return check.
    pub coords_to_ignore: HashSet<Location>,
    /// Timestamp of the current round's first dispatch.
    pub round_started_at: Option<f64>,
    /// True while the area is in its initial-calibration phase.
    pub init: bool,
    /// Completed-round counter during the init phase.
    pub init_rounds_done: u32,
    /// Whether `start_routemanager` has been called yet.
    pub started: bool,
    /// True while a route recalculation is in flight, to prevent reentrancy.
    pub start_calc: bool,
    /// Count of not-yet-processed hits per location, for modes that track it.
    pub pending_counts: HashMap<Location, u32>,
}

/// Everything guarded by the workers lock: the registry and round counters.
#[derive(Debug, Default)]
pub struct WorkerState {
    /// Registered origins, in registration order.
    pub workers_registered: Vec<String>,
    /// Completed-round count per origin.
    pub rounds: HashMap<String, u32>,
}
