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

//! The mode vtable (C7): every concrete mode (iv_mitm, pokestops, mon_mitm,
//! raids_mitm, ...) supplies one of these instead of subclassing an abstract
//! manager. `RouteManager` holds a `Arc<dyn ModeHooks>` and never matches on
//! a mode tag internally.

use async_trait::async_trait;
use dispatch_types::{DispatchError, Location, PriorityEvent};

/// Mode-supplied behavior parameterizing the dispatcher.
///
/// Every method here corresponds 1:1 to a hook a concrete mode must define;
/// `RouteManager` calls these and never special-cases a mode by name.
#[async_trait]
pub trait ModeHooks: Send + Sync + std::fmt::Debug {
    /// Return the current list of priority events, or `None` if there is
    /// nothing new. Called once per priority-tick cycle.
    async fn retrieve_latest_priority_queue(
        &self,
    ) -> Result<Option<Vec<PriorityEvent>>, DispatchError>;

    /// One-time, idempotent startup (e.g. spawn the priority tick).
    async fn start_routemanager(&self);

    /// Tear down background work and release resources.
    async fn quit_route(&self);

    /// Coordinates to install once the init-calibration phase completes.
    /// Responsible for persisting the area's `init = false` flag as a side
    /// effect, since only the mode knows which persisted-config entry
    /// corresponds to this manager.
    async fn get_coords_post_init(&self) -> Result<Vec<Location>, DispatchError>;

    /// Permits or filters a candidate before it is handed to a caller.
    fn check_coords_before_returning(&self, lat: f64, lng: f64) -> bool;

    /// Triggers a route recalculation appropriate to this mode. Returns the
    /// freshly planned route.
    async fn recalc_route_workertype(
        &self,
        coords_raw: &[Location],
    ) -> Result<Vec<Location>, DispatchError>;

    /// Whether dispatch should keep serving a worker past a drained route
    /// (rolling-refill modes) instead of returning `None`.
    fn get_coords_after_finish_route(&self) -> bool;

    /// `(window_seconds, window_meters)` passed to the clustering helper.
    /// A mode with opaque per-event payloads (e.g. IV) should pick values
    /// that disable clustering at the call site instead.
    fn cluster_priority_queue_criteria(&self) -> (f64, f64);

    /// Seconds between priority-tick cycles; `None`/`0.0` disables C2.
    fn priority_queue_update_interval(&self) -> Option<f64>;

    /// Whether normal dispatch consumes coords from the round remainder.
    fn delete_coord_after_fetch(&self) -> bool;

    /// Whether clustering should be skipped to preserve opaque payloads
    /// carried on priority events (true for `iv_mitm`).
    fn skip_clustering(&self) -> bool {
        false
    }

    /// Stable mode tag (`"iv_mitm"`, `"pokestops"`, `"mon_mitm"`, ...),
    /// exposed read-only for observability.
    fn mode_name(&self) -> &str;
}
