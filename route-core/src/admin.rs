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

//! Administrative read-only queries (C8).

use dispatch_types::{Location, PriorityEvent};

use crate::state::{ManagerState, PositionType, WorkerState};

/// `(served_in_round, route_length)`; `(1, 1)` when the route is empty,
/// a sentinel for "nothing to report yet".
pub fn route_status(state: &ManagerState) -> (usize, usize) {
    if state.route.is_empty() {
        return (1, 1);
    }
    (
        state.route.len() - state.current_round_remainder.len(),
        state.route.len(),
    )
}

/// Completed-round count for `origin`, or `999` for an unknown origin (the
/// source's sentinel for "uninitialized").
pub fn rounds(workers: &WorkerState, origin: &str) -> u32 {
    *workers.rounds.get(origin).unwrap_or(&999)
}

/// Snapshot of the current route.
pub fn current_route(state: &ManagerState) -> Vec<Location> {
    state.route.clone()
}

/// Snapshot of the current priority heap, in arbitrary (heap) order.
pub fn current_prioroute(state: &ManagerState) -> Vec<PriorityEvent> {
    state.prio_heap.iter().map(|r| r.0.clone()).collect()
}

/// Number of currently registered origins.
pub fn registered_workers(workers: &WorkerState) -> usize {
    workers.workers_registered.len()
}

/// The last position type served to `origin`, if any.
pub fn position_type(state: &ManagerState, origin: &str) -> Option<PositionType> {
    state.position_type.get(origin).copied()
}

/// Per-origin open-queue depth, for operator visibility.
pub fn workerpool_snapshot(state: &ManagerState) -> Vec<(String, usize)> {
    state
        .routepool_order
        .iter()
        .map(|origin| (origin.clone(), state.routepool[origin].queue.len()))
        .collect()
}

/// Not-yet-processed hit counts per location (supplemented from the
/// original's `_stops_not_processed` bookkeeping).
pub fn pending_counts(state: &ManagerState) -> Vec<(Location, u32)> {
    state.pending_counts.iter().map(|(l, n)| (*l, *n)).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_route_reports_sentinel() {
        let state = ManagerState::default();
        assert_eq!(route_status(&state), (1, 1));
    }

    #[test]
    fn unknown_origin_rounds_is_999() {
        let workers = WorkerState::default();
        assert_eq!(rounds(&workers, "ghost"), 999);
    }
}
