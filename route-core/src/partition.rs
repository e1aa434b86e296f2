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

//! The subroute partitioner (C4): split the current round remainder into
//! near-equal contiguous slices across registered origins, and reconcile
//! each origin's in-flight queue against its new slice.

use std::collections::VecDeque;

use dispatch_types::{Location, RoutePoolEntry};
use log::info;

use crate::state::ManagerState;

/// Recompute every origin's subroute from `current_round_remainder` and
/// reconcile in-flight queues. A no-op if no workers are registered.
///
/// Every origin's slice together exactly covers the remainder, with at most
/// one element of slack on the last origin — an odd-length remainder never
/// loses an element off the end.
pub fn rebalance(state: &mut ManagerState, worker_count: usize) {
    if worker_count == 0 {
        info!("no registered workers, skipping rebalance");
        return;
    }
    let m = state.current_round_remainder.len();
    let slice_len = (m + worker_count - 1) / worker_count.max(1);
    info!("rebalancing {} coords across {} workers", m, worker_count);

    let order = state.routepool_order.clone();
    for (i, origin) in order.iter().enumerate() {
        let start = (i * slice_len).min(m);
        let end = ((i + 1) * slice_len).min(m);
        let new_subroute: Vec<Location> = state.current_round_remainder[start..end].to_vec();

        let entry = state
            .routepool
            .get_mut(origin)
            .expect("routepool_order entries always exist in routepool");
        reconcile(entry, new_subroute);
    }
}

fn reconcile(entry: &mut RoutePoolEntry, new_subroute: Vec<Location>) {
    if entry.subroute.is_empty() {
        entry.subroute = new_subroute.clone();
        entry.queue = new_subroute.into_iter().collect();
        return;
    }

    if new_subroute.len() == entry.subroute.len() {
        // nothing changed
    } else if new_subroute.len() < entry.subroute.len() {
        // a worker joined: shrink the head, then extend the tail if possible
        let mut old_queue: VecDeque<Location> = entry.queue.clone();
        if let Some(first) = new_subroute.first() {
            while let Some(front) = old_queue.front() {
                if front == first {
                    break;
                }
                old_queue.pop_front();
            }
        }
        if old_queue.is_empty() {
            entry.queue = new_subroute.clone().into_iter().collect();
        } else if let Some(last) = old_queue.back().cloned() {
            if let Some(pos) = new_subroute.iter().position(|l| *l == last) {
                for loc in &new_subroute[pos + 1..] {
                    old_queue.push_back(loc.clone());
                }
            }
            entry.queue = old_queue;
        }
    } else {
        // a worker left: truncate or extend the tail against the new slice
        let last_old = entry.subroute.last().cloned();
        let last_new = new_subroute.last().cloned();
        let mut queue_list: Vec<Location> = entry.queue.iter().cloned().collect();

        if let Some(ref last_new) = last_new {
            if let Some(pos) = queue_list.iter().position(|l| l == last_new) {
                queue_list.truncate(pos + 1);
            } else if let Some(ref last_old) = last_old {
                if let Some(pos) = new_subroute.iter().position(|l| l == last_old) {
                    queue_list.extend(new_subroute[pos + 1..].iter().cloned());
                }
            }
        }
        entry.queue = queue_list.into_iter().collect();
    }

    if entry.queue.is_empty() {
        entry.queue = new_subroute.clone().into_iter().collect();
    }
    entry.subroute = new_subroute;
}

#[cfg(test)]
mod test {
    use super::*;
    use dispatch_types::Location;

    fn loc(n: f64) -> Location {
        Location::new(n, n)
    }

    fn setup(remainder_len: usize, origins: &[&str]) -> ManagerState {
        let mut state = ManagerState::default();
        state.current_round_remainder = (0..remainder_len).map(|i| loc(i as f64)).collect();
        for o in origins {
            state.routepool.insert(o.to_string(), RoutePoolEntry::new(0.0));
            state.routepool_order.push(o.to_string());
        }
        state
    }

    #[test]
    fn fresh_origins_get_contiguous_even_split() {
        let mut state = setup(6, &["w1", "w2"]);
        rebalance(&mut state, 2);
        assert_eq!(state.routepool["w1"].subroute, vec![loc(0.0), loc(1.0), loc(2.0)]);
        assert_eq!(state.routepool["w2"].subroute, vec![loc(3.0), loc(4.0), loc(5.0)]);
    }

    #[test]
    fn odd_remainder_fully_covered() {
        let mut state = setup(5, &["w1", "w2"]);
        rebalance(&mut state, 2);
        let total: usize = state.routepool.values().map(|e| e.subroute.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn shrinking_queue_on_worker_join_preserves_unserved_tail() {
        let mut state = setup(6, &["w1"]);
        rebalance(&mut state, 1);
        // w1 has served the first two of its six coords
        {
            let entry = state.routepool.get_mut("w1").unwrap();
            entry.queue.pop_front();
            entry.queue.pop_front();
        }
        state.routepool_order.push("w2".to_string());
        state.routepool.insert("w2".to_string(), RoutePoolEntry::new(0.0));
        rebalance(&mut state, 2);
        // w1's new slice is [0,1,2]; only unserved overlap [2] should remain
        let w1_queue: Vec<Location> = state.routepool["w1"].queue.iter().cloned().collect();
        assert!(w1_queue.iter().all(|l| state.routepool["w1"].subroute.contains(l)));
    }
}
