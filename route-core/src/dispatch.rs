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

//! The next-location dispatcher (C6): the per-call state machine that
//! returns the next coordinate for an origin.

use std::cmp::Reverse;

use dispatch_types::{DispatchError, Location};
use log::{debug, info};

use crate::manager::RouteManager;
use crate::partition;
use crate::state::PositionType;

/// Boxed-future recursion depth guard isn't needed here: every recursive
/// tail call in this function corresponds to one consumed or rejected
/// coordinate, so it terminates.
pub async fn next(manager: &RouteManager, origin: &str) -> Result<Option<Location>, DispatchError> {
    let now = manager.clock().now();

    // Step 1: recalc if the route is empty.
    {
        let route_is_empty = manager.manager_state().lock().await.route.is_empty();
        if route_is_empty {
            recalc_route_workertype(manager).await?;
        }
    }

    // Step 2: ensure a routepool entry exists for this origin.
    manager.ensure_routepool_entry(origin, now).await;

    // Step 3: lazily start the manager.
    let started = manager.manager_state().lock().await.started;
    if !started {
        info!("starting routemanager {} from next()", manager.name());
        manager.start().await;
    }

    // Step 4: a concurrent recalculation is already underway.
    if manager.manager_state().lock().await.start_calc {
        debug!("another task is already recalculating the route");
        return Ok(None);
    }

    let init = manager.manager_state().lock().await.init;

    // Step 5: availability wait loop (skipped during init).
    if !init {
        loop {
            let available = {
                let state = manager.manager_state().lock().await;
                let started = state.started;
                if !started {
                    break;
                }
                !state.current_round_remainder.is_empty()
                    || state
                        .routepool
                        .get(origin)
                        .map(|e| !e.queue.is_empty())
                        .unwrap_or(false)
                    || !state.prio_heap.is_empty()
            };
            if available {
                break;
            }
            debug!("{}: no location available yet", manager.name());
            if manager.mode_hooks().get_coords_after_finish_route() {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            } else {
                info!("not getting new coords - leaving worker {}", origin);
                return Ok(None);
            }
        }
    }

    let candidate = {
        let mut state = manager.manager_state().lock().await;

        let delay_after_prio = manager.settings().delay_after_prio_event;
        let starve_route = manager.settings().starve_route;
        let last_round_was_prio = *state.last_round_prio.get(origin).unwrap_or(&false);
        let prio_due = state
            .prio_heap
            .peek()
            .map(|Reverse(ev)| ev.due_at < now)
            .unwrap_or(false);

        let take_priority =
            delay_after_prio.is_some() && (!last_round_was_prio || starve_route) && prio_due;

        if take_priority {
            debug!("{}: priority event", manager.name());
            let event = state.prio_heap.pop().expect("prio_due implies non-empty").0;
            state.last_round_prio.insert(origin.to_string(), true);
            state.position_type.insert(origin.to_string(), PositionType::Priority);
            info!(
                "{}: moving to {} for a priority event",
                manager.name(),
                event.location
            );
            Some(event.location)
        } else {
            debug!("{}: moving on with route", manager.name());
            state.position_type.insert(origin.to_string(), PositionType::Normal);
            drop(state);

            let at_boundary = crate::manager::bump_round_if_boundary(
                manager.manager_state(),
                manager.workers_state(),
                now,
            )
            .await;
            if at_boundary && manager.manager_state().lock().await.route.is_empty() {
                return Ok(None);
            }

            if init {
                if let Some(result) = handle_init_completion(manager, origin).await? {
                    return Ok(result);
                }
            }

            let mut state = manager.manager_state().lock().await;
            let queue_empty = state
                .routepool
                .get(origin)
                .map(|e| e.queue.is_empty())
                .unwrap_or(true);
            if queue_empty {
                let count = manager.workers_state().lock().await.workers_registered.len();
                partition::rebalance(&mut state, count);
            }

            let popped = state
                .routepool
                .get_mut(origin)
                .and_then(|e| e.queue.pop_front());
            let Some(next_coord) = popped else {
                return Ok(None);
            };
            if let Some(entry) = state.routepool.get_mut(origin) {
                entry.last_access = now;
            }
            if manager.mode_hooks().delete_coord_after_fetch() {
                state.current_round_remainder.retain(|l| l != &next_coord);
                if state.current_round_remainder.is_empty() && !state.route.is_empty() {
                    // the round remainder is refilled to a full copy of the
                    // route as soon as it drains, so a non-rolling route
                    // cycles indefinitely instead of stalling until the next
                    // availability check.
                    state.current_round_remainder = state.route.clone();
                }
            }
            state.last_round_prio.insert(origin.to_string(), false);
            info!(
                "{}: moving on with location {} [{} left in workerpool]",
                manager.name(),
                next_coord,
                state.routepool.get(origin).map(|e| e.queue.len()).unwrap_or(0)
            );
            Some(next_coord)
        }
    };

    let Some(candidate) = candidate else {
        return Ok(None);
    };

    // Step 8: pre-return check, with the lock released.
    let permanently_ignored = manager.manager_state().lock().await.coords_to_ignore.contains(&candidate);
    let permitted =
        !permanently_ignored && manager.mode_hooks().check_coords_before_returning(candidate.lat, candidate.lng);
    if permitted {
        Ok(Some(candidate))
    } else {
        Box::pin(next(manager, origin)).await
    }
}

async fn recalc_route_workertype(manager: &RouteManager) -> Result<(), DispatchError> {
    let mut state = manager.manager_state().lock().await;
    if state.start_calc {
        return Ok(());
    }
    state.start_calc = true;
    let coords = state.coords_raw.clone().unwrap_or_default();
    drop(state);

    let new_route = manager.mode_hooks().recalc_route_workertype(&coords).await?;

    let mut state = manager.manager_state().lock().await;
    state.route = new_route.clone();
    state.current_round_remainder = new_route;
    state.start_calc = false;
    Ok(())
}

/// Handle init-phase completion: after `init_mode_rounds` full
/// rounds with this origin's queue drained, swap in post-init coordinates
/// and recompute the route. Returns `Some(result)` if the caller should
/// short-circuit and return that result (always `None` on completion, or
/// `None` inner if another task beat us to the recalculation).
async fn handle_init_completion(
    manager: &RouteManager,
    origin: &str,
) -> Result<Option<Option<Location>>, DispatchError> {
    let (remainder_empty, queue_empty) = {
        let state = manager.manager_state().lock().await;
        (
            state.current_round_remainder.is_empty(),
            state
                .routepool
                .get(origin)
                .map(|e| e.queue.is_empty())
                .unwrap_or(true),
        )
    };
    if !remainder_empty || !queue_empty {
        return Ok(None);
    }

    let mut state = manager.manager_state().lock().await;
    state.init_rounds_done += 1;
    let done_enough = state.init_rounds_done >= manager.settings().init_mode_rounds;
    if !done_enough {
        return Ok(None);
    }
    if state.start_calc {
        return Ok(Some(None));
    }
    state.start_calc = true;
    drop(state);

    info!("init of {} done, calculating new route", manager.name());
    let post_init_coords = manager.mode_hooks().get_coords_post_init().await?;

    let mut state = manager.manager_state().lock().await;
    state.coords_raw = Some(post_init_coords);
    drop(state);

    recalc_route_workertype(manager).await?;

    let mut state = manager.manager_state().lock().await;
    state.init = false;
    state.start_calc = false;

    Ok(Some(None))
}
