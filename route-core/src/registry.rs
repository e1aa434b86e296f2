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

//! The worker registry (C3): register/unregister origins and track their
//! round counters. Guarded by a lock distinct from the manager lock, per the
//! ordering discipline (`workers_lock` acquired before `manager_lock`).

use log::info;

use crate::state::WorkerState;

/// Register `origin`. Returns `false` if it was already registered.
pub fn register(state: &mut WorkerState, origin: &str) -> bool {
    if state.workers_registered.iter().any(|o| o == origin) {
        info!("worker {} already registered", origin);
        return false;
    }
    info!("registering worker {}", origin);
    state.workers_registered.push(origin.to_string());
    state.rounds.insert(origin.to_string(), 0);
    true
}

/// Unregister `origin`. Returns `true` if the registry is now empty (the
/// caller should call `quit_route` in that case).
pub fn unregister(state: &mut WorkerState, origin: &str) -> bool {
    if let Some(pos) = state.workers_registered.iter().position(|o| o == origin) {
        info!("unregistering worker {}", origin);
        state.workers_registered.remove(pos);
    } else {
        info!(
            "worker {} failed unregistering: not currently registered",
            origin
        );
    }
    state.rounds.remove(origin);
    state.workers_registered.is_empty()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let mut state = WorkerState::default();
        assert!(register(&mut state, "w1"));
        assert!(!register(&mut state, "w1"));
        assert_eq!(state.workers_registered.len(), 1);
    }

    #[test]
    fn unregister_reports_emptiness() {
        let mut state = WorkerState::default();
        register(&mut state, "w1");
        assert!(unregister(&mut state, "w1"));
        assert!(!state.rounds.contains_key("w1"));
    }

    #[test]
    fn unregister_unknown_is_not_fatal() {
        let mut state = WorkerState::default();
        register(&mut state, "w1");
        assert!(!unregister(&mut state, "ghost"));
        assert_eq!(state.workers_registered.len(), 1);
    }
}
