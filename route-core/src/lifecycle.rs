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

//! Route lifecycle (C5): round-boundary detection and init-phase
//! bookkeeping, called from the C6 state machine.

use log::info;

use crate::state::{ManagerState, WorkerState};

/// True iff the current round remainder has been fully reclaimed to the
/// length of the route, i.e. we are sitting at a round boundary.
pub fn at_round_boundary(state: &ManagerState) -> bool {
    state.route.len() == state.current_round_remainder.len()
}

/// Handle a detected round boundary: bump every origin's round counter (if
/// a round had actually started), reset the round-start timestamp, and
/// refill the remainder. Returns `true` if the route is empty (caller
/// should report no location).
pub fn handle_round_boundary(state: &mut ManagerState, workers: &mut WorkerState, now: f64) -> bool {
    if state.round_started_at.is_some() {
        let started = state.round_started_at.unwrap();
        info!(
            "round complete, took {:.1}s, bumping round counters",
            now - started
        );
        for count in workers.rounds.values_mut() {
            *count += 1;
        }
    }
    state.round_started_at = Some(now);
    state.route.is_empty()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detects_boundary_when_remainder_equals_route() {
        let mut state = ManagerState::default();
        state.route = vec![];
        state.current_round_remainder = vec![];
        assert!(at_round_boundary(&state));
    }

    #[test]
    fn bumps_rounds_only_after_a_round_has_started() {
        let mut state = ManagerState::default();
        let mut workers = WorkerState::default();
        workers.rounds.insert("w1".into(), 0);

        // first boundary hit has no prior round_started_at: no bump yet
        handle_round_boundary(&mut state, &mut workers, 10.0);
        assert_eq!(workers.rounds["w1"], 0);

        // second boundary: a round has elapsed
        handle_round_boundary(&mut state, &mut workers, 20.0);
        assert_eq!(workers.rounds["w1"], 1);
    }
}
