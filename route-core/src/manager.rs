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

//! `RouteManager`, the top-level handle gluing C1-C8 together. Cheap to
//! clone — every field is an `Arc`, so handing a manager to one task per
//! worker origin (mirroring how a connected client drives dispatch) is just
//! a refcount bump.

use std::sync::Arc;

use dispatch_types::{ClusteringHelper, DispatchError, GeofenceFilter, Location, RoutePlanner, RoutePoolEntry, Settings};
use log::{info, warn};
use tokio::sync::{broadcast, Mutex};

use crate::admin;
use crate::clock::Clock;
use crate::dispatch;
use crate::lifecycle;
use crate::mode::ModeHooks;
use crate::partition;
use crate::priority_tick;
use crate::registry;
use crate::state::{ManagerState, PositionType, WorkerState};

/// A geographic route dispatcher for a single area.
#[derive(Debug, Clone)]
pub struct RouteManager {
    name: String,
    settings: Settings,
    manager_state: Arc<Mutex<ManagerState>>,
    workers_state: Arc<Mutex<WorkerState>>,
    /// Reserved for gating a full bulk rebalance pass; nothing else contends
    /// on it today.
    fillup_lock: Arc<Mutex<()>>,
    mode_hooks: Arc<dyn ModeHooks>,
    planner: Arc<dyn RoutePlanner>,
    geofence: Arc<dyn GeofenceFilter>,
    clustering: Arc<dyn ClusteringHelper>,
    clock: Arc<dyn Clock>,
    stop_tx: broadcast::Sender<()>,
}

impl RouteManager {
    /// Construct a manager: geofence `coords` (unless `init` is set, in
    /// which case the raw coords are used as-is), plan a route over the
    /// result, and populate the round remainder.
    pub fn new(
        name: impl Into<String>,
        settings: Settings,
        coords: Vec<Location>,
        init: bool,
        mode_hooks: Arc<dyn ModeHooks>,
        planner: Arc<dyn RoutePlanner>,
        geofence: Arc<dyn GeofenceFilter>,
        clustering: Arc<dyn ClusteringHelper>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DispatchError> {
        let fenced = if init {
            coords.clone()
        } else {
            geofence.filter(&coords)
        };
        let route = planner.plan(&fenced, settings.max_radius, settings.max_per_cluster, &settings.calctype)?;

        let mut state = ManagerState {
            coords_raw: Some(coords),
            current_round_remainder: route.clone(),
            route,
            init,
            ..Default::default()
        };
        state.has_priority_overlay = settings.delay_after_prio_event.is_some();

        let (stop_tx, _) = broadcast::channel(1);

        Ok(Self {
            name: name.into(),
            settings,
            manager_state: Arc::new(Mutex::new(state)),
            workers_state: Arc::new(Mutex::new(WorkerState::default())),
            fillup_lock: Arc::new(Mutex::new(())),
            mode_hooks,
            planner,
            geofence,
            clustering,
            clock,
            stop_tx,
        })
    }

    /// Stable area name, used in log lines and the persisted-config lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration this manager was constructed with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Stable mode tag (`"iv_mitm"`, `"pokestops"`, `"mon_mitm"`, ...).
    pub fn mode(&self) -> &str {
        self.mode_hooks.mode_name()
    }

    /// Raw IV id list this manager was configured with.
    pub fn ids_iv(&self) -> &[i64] {
        &self.settings.mon_ids_iv_raw
    }

    /// The geofence this manager filters discovered coordinates through.
    pub fn geofence_helper(&self) -> &Arc<dyn GeofenceFilter> {
        &self.geofence
    }

    /// Register `origin`; triggers a rebalance on success.
    pub async fn register_worker(&self, origin: &str) -> bool {
        let added = {
            let mut workers = self.workers_state.lock().await;
            registry::register(&mut workers, origin)
        };
        if added {
            let mut state = self.manager_state.lock().await;
            state.position_type.insert(origin.to_string(), PositionType::Normal);
            let count = self.workers_state.lock().await.workers_registered.len();
            partition::rebalance(&mut state, count);
        }
        added
    }

    /// Unregister `origin`; calls `quit_route` if the registry becomes
    /// empty while started.
    pub async fn unregister_worker(&self, origin: &str) {
        let became_empty = {
            let mut workers = self.workers_state.lock().await;
            registry::unregister(&mut workers, origin)
        };
        let mut state = self.manager_state.lock().await;
        if state.routepool.remove(origin).is_some() {
            info!("cleaning up routepool for origin {}", origin);
        }
        state.routepool_order.retain(|o| o != origin);
        state.position_type.remove(origin);
        state.last_round_prio.remove(origin);

        if became_empty && state.started {
            info!("routemanager {} has no subscribers left, quitting", self.name);
            state.started = false;
            drop(state);
            self.mode_hooks.quit_route().await;
        }
    }

    /// Unregister every worker and signal each one to stop.
    pub async fn stop_workers(&self) {
        let origins = {
            let workers = self.workers_state.lock().await;
            workers.workers_registered.clone()
        };
        for origin in origins {
            info!("stopping worker {} from routemanager {}", origin, self.name);
            self.unregister_worker(&origin).await;
        }
    }

    /// Start the manager if this is the first call (idempotent): runs the
    /// mode's own one-time setup, then spawns the priority tick if the mode
    /// wants one.
    pub async fn start(&self) {
        let mut state = self.manager_state.lock().await;
        if state.started {
            return;
        }
        state.started = true;
        drop(state);

        self.mode_hooks.start_routemanager().await;

        if let Some(interval) = self.mode_hooks.priority_queue_update_interval() {
            if interval > 0.0 {
                let manager = self.clone();
                tokio::spawn(async move { manager.run_priority_tick_loop(interval).await });
            }
        }
    }

    /// Signal the priority tick to exit at its next wake.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(());
    }

    async fn run_priority_tick_loop(&self, interval_secs: f64) {
        let mut stop_rx = self.stop_tx.subscribe();
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs_f64(interval_secs.max(0.01)));
        loop {
            tokio::select! {
                biased;
                _ = stop_rx.recv() => {
                    info!("priority tick for {} stopping", self.name);
                    return;
                }
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    priority_tick::run_tick(
                        &self.manager_state,
                        self.mode_hooks.as_ref(),
                        self.clustering.as_ref(),
                        self.settings.remove_from_queue_backlog,
                        now,
                    ).await;

                    let worker_count = self.workers_state.lock().await.workers_registered.len();
                    let mut state = self.manager_state.lock().await;
                    priority_tick::reap_and_rebalance(&mut state, now, self.settings.idle_timeout_secs, worker_count);
                }
            }
        }
    }

    /// Re-plan using `coords_raw`, reset the round remainder, and clear the
    /// init flag's rounds-done counter.
    pub async fn recalc_route(&self) -> Result<(), DispatchError> {
        let coords = {
            let state = self.manager_state.lock().await;
            state.coords_raw.clone().unwrap_or_default()
        };
        let fenced = self.geofence.filter(&coords);
        let new_route = self.planner.plan(
            &fenced,
            self.settings.max_radius,
            self.settings.max_per_cluster,
            &self.settings.calctype,
        )?;
        let mut state = self.manager_state.lock().await;
        state.route = new_route.clone();
        state.current_round_remainder = new_route;
        Ok(())
    }

    /// Append newly-discovered coordinates to the raw pool, after
    /// geofencing (for modes that discover coordinates incrementally, e.g.
    /// pokestops).
    pub async fn add_coords(&self, coords: Vec<Location>) {
        let fenced = self.geofence.filter(&coords);
        let mut state = self.manager_state.lock().await;
        state.coords_raw.get_or_insert_with(Vec::new).extend(fenced);
    }

    /// Permanently skip `(lat, lng)` at the next-location pre-return check.
    /// Silently dropped if the coordinate is out of range.
    pub async fn add_coord_to_be_removed(&self, lat: f64, lng: f64) {
        let location = Location::new(lat, lng);
        if !location.is_valid() {
            return;
        }
        let mut state = self.manager_state.lock().await;
        state.coords_to_ignore.insert(location);
    }

    /// The next-location dispatcher (C6). See `dispatch::next` for the
    /// state machine itself.
    pub async fn next(&self, origin: &str) -> Result<Option<Location>, DispatchError> {
        dispatch::next(self, origin).await
    }

    pub(crate) fn manager_state(&self) -> &Arc<Mutex<ManagerState>> {
        &self.manager_state
    }

    pub(crate) fn workers_state(&self) -> &Arc<Mutex<WorkerState>> {
        &self.workers_state
    }

    pub(crate) fn mode_hooks(&self) -> &Arc<dyn ModeHooks> {
        &self.mode_hooks
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Record one unprocessed hit at `location`.
    pub async fn record_pending(&self, location: Location) {
        let mut state = self.manager_state.lock().await;
        *state.pending_counts.entry(location).or_insert(0) += 1;
    }

    /// Clear the unprocessed-hit count for `location`.
    pub async fn clear_pending(&self, location: Location) {
        let mut state = self.manager_state.lock().await;
        state.pending_counts.remove(&location);
    }

    /// Ensure a routepool entry exists for `origin`, inserting and
    /// rebalancing if this is its first appearance.
    pub(crate) async fn ensure_routepool_entry(&self, origin: &str, now: f64) {
        let mut state = self.manager_state.lock().await;
        if !state.routepool.contains_key(origin) {
            state.routepool.insert(origin.to_string(), RoutePoolEntry::new(now));
            state.routepool_order.push(origin.to_string());
            drop(state);
            let count = self.workers_state.lock().await.workers_registered.len();
            let mut state = self.manager_state.lock().await;
            partition::rebalance(&mut state, count);
        }
    }

    // -- administrative queries (C8) --------------------------------------

    /// `(served_in_round, route_length)`.
    pub async fn route_status(&self) -> (usize, usize) {
        admin::route_status(&*self.manager_state.lock().await)
    }

    /// Completed rounds for `origin`, or `999` if unknown.
    pub async fn rounds(&self, origin: &str) -> u32 {
        admin::rounds(&*self.workers_state.lock().await, origin)
    }

    /// Snapshot of the current route.
    pub async fn current_route(&self) -> Vec<Location> {
        admin::current_route(&*self.manager_state.lock().await)
    }

    /// Snapshot of the current priority heap.
    pub async fn current_prioroute(&self) -> Vec<dispatch_types::PriorityEvent> {
        admin::current_prioroute(&*self.manager_state.lock().await)
    }

    /// Number of currently registered origins.
    pub async fn registered_workers(&self) -> usize {
        admin::registered_workers(&*self.workers_state.lock().await)
    }

    /// The last position type served to `origin`, if any.
    pub async fn position_type(&self, origin: &str) -> Option<PositionType> {
        admin::position_type(&*self.manager_state.lock().await, origin)
    }

    /// Whether this area is in its calibration phase.
    pub async fn is_init(&self) -> bool {
        self.manager_state.lock().await.init
    }

    /// Per-origin open-queue depth.
    pub async fn workerpool_snapshot(&self) -> Vec<(String, usize)> {
        admin::workerpool_snapshot(&*self.manager_state.lock().await)
    }

    /// Not-yet-processed hit counts per location.
    pub async fn pending_counts(&self) -> Vec<(Location, u32)> {
        admin::pending_counts(&*self.manager_state.lock().await)
    }
}

/// Bump every origin's round counter; exposed for the dispatcher to call
/// under the manager lock via `lifecycle::handle_round_boundary`.
pub(crate) async fn bump_round_if_boundary(
    manager_state: &Mutex<ManagerState>,
    workers_state: &Mutex<WorkerState>,
    now: f64,
) -> bool {
    let mut ms = manager_state.lock().await;
    if !lifecycle::at_round_boundary(&ms) {
        return false;
    }
    let mut ws = workers_state.lock().await;
    let route_empty = lifecycle::handle_round_boundary(&mut ms, &mut ws, now);
    if route_empty {
        warn!("route is empty, nothing to dispatch");
    }
    true
}
