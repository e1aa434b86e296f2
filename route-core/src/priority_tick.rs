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

//! The priority queue manager (C2) and the idle reaper, which
//! piggybacks on the same tick.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use dispatch_types::ClusteringHelper;
use log::{info, warn};

use crate::mode::ModeHooks;
use crate::partition;
use crate::state::ManagerState;

/// One cycle of the priority queue manager: fetch, drop stale entries,
/// cluster (unless the mode wants opaque payloads preserved), and swap the
/// heap in under the manager lock.
///
/// A failed fetch leaves the previous heap untouched and is logged, not
/// propagated — a single bad cycle must never kill the tick.
pub async fn run_tick(
    state: &tokio::sync::Mutex<ManagerState>,
    mode_hooks: &dyn ModeHooks,
    clustering: &dyn ClusteringHelper,
    remove_from_queue_backlog: f64,
    now: f64,
) {
    let fetched = match mode_hooks.retrieve_latest_priority_queue().await {
        Ok(fetched) => fetched,
        Err(err) => {
            warn!("priority queue fetch failed, keeping prior heap: {}", err);
            return;
        }
    };
    let Some(mut events) = fetched else {
        return;
    };

    if remove_from_queue_backlog > 0.0 {
        let cutoff = now - remove_from_queue_backlog;
        events.retain(|e| e.due_at >= cutoff);
    }
    events.retain(|e| e.location.is_valid());

    info!("new raw priority queue with {} entries", events.len());
    let merged = if mode_hooks.skip_clustering() {
        events
    } else {
        clustering.get_clustered(events)
    };

    let heap: BinaryHeap<Reverse<_>> = merged.into_iter().map(Reverse).collect();
    info!("new clustered priority queue with {} entries", heap.len());

    let mut guard = state.lock().await;
    guard.prio_heap = heap;
    guard.has_priority_overlay = true;
}

/// Evict any origin whose `last_access` is older than `timeout` seconds.
/// Returns `true` if anything was evicted (the caller should rebalance).
pub fn reap_idle(state: &mut ManagerState, now: f64, timeout: f64) -> bool {
    let stale: Vec<String> = state
        .routepool
        .iter()
        .filter(|(_, entry)| now - entry.last_access > timeout)
        .map(|(origin, _)| origin.clone())
        .collect();

    for origin in &stale {
        warn!(
            "worker {} has not accessed a location in over {} seconds, evicting",
            origin, timeout
        );
        state.routepool.remove(origin);
        state.routepool_order.retain(|o| o != origin);
    }
    !stale.is_empty()
}

/// Run the idle reaper and, if it changed anything, rebalance.
pub fn reap_and_rebalance(state: &mut ManagerState, now: f64, timeout: f64, worker_count: usize) {
    if reap_idle(state, now, timeout) {
        partition::rebalance(state, worker_count);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dispatch_types::{Location, RoutePoolEntry};

    #[test]
    fn reaps_only_stale_origins() {
        let mut state = ManagerState::default();
        state.routepool.insert("fresh".into(), RoutePoolEntry::new(100.0));
        state.routepool_order.push("fresh".into());
        state.routepool.insert("stale".into(), RoutePoolEntry::new(0.0));
        state.routepool_order.push("stale".into());

        let changed = reap_idle(&mut state, 1000.0, 300.0);
        assert!(changed);
        assert!(state.routepool.contains_key("fresh"));
        assert!(!state.routepool.contains_key("stale"));
        assert_eq!(state.routepool_order, vec!["fresh".to_string()]);
    }

    #[test]
    fn untouched_when_nothing_stale() {
        let mut state = ManagerState::default();
        state.routepool.insert("fresh".into(), RoutePoolEntry::new(999.0));
        state.routepool_order.push("fresh".into());
        assert!(!reap_idle(&mut state, 1000.0, 300.0));
    }

    #[test]
    fn invalid_locations_dropped_before_clustering() {
        let loc = Location::new(0.0, 0.0);
        assert!(loc.is_valid());
        let bad = Location::new(999.0, 0.0);
        assert!(!bad.is_valid());
    }
}
