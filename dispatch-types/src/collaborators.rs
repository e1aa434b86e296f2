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

//! Interfaces for the external collaborators this dispatcher never
//! implements itself (route planner, geofence filter, clustering helper,
//! event source, persisted configuration). The dispatcher core only ever
//! talks to these traits; `dispatch-modes` supplies concrete
//! implementations.

use async_trait::async_trait;

use crate::{AreaConfigDocument, DispatchError, Location, PriorityEvent};

/// Given a list of fenced coordinates, radius constraints and an algorithm
/// tag, returns an ordered traversal. A pure function in spirit; allowed to
/// cache to disk as a side effect.
pub trait RoutePlanner: Send + Sync + std::fmt::Debug {
    /// Compute an ordered traversal over `coords`.
    fn plan(
        &self,
        coords: &[Location],
        max_radius: f64,
        max_per_cluster: u32,
        algorithm: &str,
    ) -> Result<Vec<Location>, DispatchError>;
}

/// Given raw coordinates, returns the subset inside include-minus-exclude
/// polygons.
pub trait GeofenceFilter: Send + Sync + std::fmt::Debug {
    /// Filter `coords` down to those inside the fence.
    fn filter(&self, coords: &[Location]) -> Vec<Location>;
}

/// Given a list of priority events and a `(time_window, distance)` criterion,
/// returns a reduced list in which co-located/co-temporal events are merged.
pub trait ClusteringHelper: Send + Sync + std::fmt::Debug {
    /// Cluster `events`, merging those within the configured window.
    fn get_clustered(&self, events: Vec<PriorityEvent>) -> Vec<PriorityEvent>;
}

/// Returns the latest batch of priority events (e.g. from a database).
#[async_trait]
pub trait EventSource: Send + Sync + std::fmt::Debug {
    /// Fetch the latest priority events, or `None` if there is nothing new
    /// to report right now.
    async fn fetch(&self) -> Result<Option<Vec<PriorityEvent>>, DispatchError>;
}

/// Reads and writes the persisted per-area configuration document.
#[async_trait]
pub trait AreaConfigStore: Send + Sync + std::fmt::Debug {
    /// Load the full document.
    async fn load(&self) -> Result<AreaConfigDocument, DispatchError>;
    /// Flip the named area's `init` flag to `false` and persist the change.
    async fn mark_init_complete(&self, area_name: &str) -> Result<(), DispatchError>;
}
