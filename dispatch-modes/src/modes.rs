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

//! Concrete mode vtables: `iv_mitm`, `pokestops`, `mon_mitm`, `raids_mitm`.
//! Each is a thin, opaque-to-the-core parameterization of `ModeHooks` — the
//! core never matches on a mode tag.

use std::sync::Arc;

use async_trait::async_trait;
use dispatch_types::{AreaConfigStore, DispatchError, EventSource, Location};
use log::info;
use route_core::mode::ModeHooks;

/// Shared plumbing every concrete mode wraps: where to fetch priority
/// events from and which persisted-config entry to flip on init completion.
#[derive(Debug)]
struct ModeCommon {
    area_name: String,
    event_source: Arc<dyn EventSource>,
    config_store: Arc<dyn AreaConfigStore>,
}

impl ModeCommon {
    async fn fetch(&self) -> Result<Option<Vec<dispatch_types::PriorityEvent>>, DispatchError> {
        self.event_source.fetch().await
    }

    async fn persist_init_complete(&self) -> Result<(), DispatchError> {
        self.config_store.mark_init_complete(&self.area_name).await
    }
}

/// `iv_mitm`: a priority overlay with opaque per-event payloads (so
/// clustering is skipped to avoid losing encounter IDs) and no normal route
/// consumption — this mode drives IV scans, never "using up" the route.
#[derive(Debug)]
pub struct IvMitmHooks {
    common: ModeCommon,
    update_interval_secs: f64,
}

impl IvMitmHooks {
    /// Build IV-mode hooks polling `event_source` every `update_interval_secs`.
    pub fn new(
        area_name: impl Into<String>,
        event_source: Arc<dyn EventSource>,
        config_store: Arc<dyn AreaConfigStore>,
        update_interval_secs: f64,
    ) -> Self {
        Self {
            common: ModeCommon {
                area_name: area_name.into(),
                event_source,
                config_store,
            },
            update_interval_secs,
        }
    }
}

#[async_trait]
impl ModeHooks for IvMitmHooks {
    async fn retrieve_latest_priority_queue(
        &self,
    ) -> Result<Option<Vec<dispatch_types::PriorityEvent>>, DispatchError> {
        self.common.fetch().await
    }

    async fn start_routemanager(&self) {
        info!("starting iv_mitm routemanager for {}", self.common.area_name);
    }

    async fn quit_route(&self) {}

    async fn get_coords_post_init(&self) -> Result<Vec<Location>, DispatchError> {
        self.common.persist_init_complete().await?;
        Ok(vec![])
    }

    fn check_coords_before_returning(&self, _lat: f64, _lng: f64) -> bool {
        true
    }

    async fn recalc_route_workertype(
        &self,
        coords_raw: &[Location],
    ) -> Result<Vec<Location>, DispatchError> {
        Ok(coords_raw.to_vec())
    }

    fn get_coords_after_finish_route(&self) -> bool {
        true
    }

    fn cluster_priority_queue_criteria(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn priority_queue_update_interval(&self) -> Option<f64> {
        Some(self.update_interval_secs)
    }

    fn delete_coord_after_fetch(&self) -> bool {
        false
    }

    fn skip_clustering(&self) -> bool {
        true
    }

    fn mode_name(&self) -> &str {
        "iv_mitm"
    }
}

/// `pokestops`: no priority queue at all; the route is continuously
/// replenished out of band as new stops are discovered (`add_coords`).
#[derive(Debug)]
pub struct PokestopsHooks {
    common: ModeCommon,
}

impl PokestopsHooks {
    /// Build pokestops-mode hooks.
    pub fn new(
        area_name: impl Into<String>,
        event_source: Arc<dyn EventSource>,
        config_store: Arc<dyn AreaConfigStore>,
    ) -> Self {
        Self {
            common: ModeCommon {
                area_name: area_name.into(),
                event_source,
                config_store,
            },
        }
    }
}

#[async_trait]
impl ModeHooks for PokestopsHooks {
    async fn retrieve_latest_priority_queue(
        &self,
    ) -> Result<Option<Vec<dispatch_types::PriorityEvent>>, DispatchError> {
        Ok(None)
    }

    async fn start_routemanager(&self) {
        info!("starting pokestops routemanager for {}", self.common.area_name);
    }

    async fn quit_route(&self) {}

    async fn get_coords_post_init(&self) -> Result<Vec<Location>, DispatchError> {
        self.common.persist_init_complete().await?;
        Ok(vec![])
    }

    fn check_coords_before_returning(&self, _lat: f64, _lng: f64) -> bool {
        true
    }

    async fn recalc_route_workertype(
        &self,
        coords_raw: &[Location],
    ) -> Result<Vec<Location>, DispatchError> {
        Ok(coords_raw.to_vec())
    }

    fn get_coords_after_finish_route(&self) -> bool {
        true
    }

    fn cluster_priority_queue_criteria(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn priority_queue_update_interval(&self) -> Option<f64> {
        None
    }

    fn delete_coord_after_fetch(&self) -> bool {
        true
    }

    fn mode_name(&self) -> &str {
        "pokestops"
    }
}

/// `mon_mitm`/`raids_mitm`: a normal cyclic route with a clustered priority
/// overlay (encounter/raid hatches). Permanent coordinate bans are handled
/// by the manager's own ignore set, not by the mode.
#[derive(Debug)]
pub struct EncounterModeHooks {
    common: ModeCommon,
    mode_name: String,
    update_interval_secs: f64,
    cluster_window_secs: f64,
    cluster_window_meters: f64,
}

impl EncounterModeHooks {
    /// Build encounter-mode hooks. `mode_name` distinguishes `mon_mitm` from
    /// `raids_mitm`; only the event source and clustering window otherwise
    /// differ between them.
    pub fn new(
        area_name: impl Into<String>,
        mode_name: impl Into<String>,
        event_source: Arc<dyn EventSource>,
        config_store: Arc<dyn AreaConfigStore>,
        update_interval_secs: f64,
        cluster_window_secs: f64,
        cluster_window_meters: f64,
    ) -> Self {
        Self {
            common: ModeCommon {
                area_name: area_name.into(),
                event_source,
                config_store,
            },
            mode_name: mode_name.into(),
            update_interval_secs,
            cluster_window_secs,
            cluster_window_meters,
        }
    }
}

#[async_trait]
impl ModeHooks for EncounterModeHooks {
    async fn retrieve_latest_priority_queue(
        &self,
    ) -> Result<Option<Vec<dispatch_types::PriorityEvent>>, DispatchError> {
        self.common.fetch().await
    }

    async fn start_routemanager(&self) {
        info!(
            "starting {} routemanager for {}",
            self.mode_name, self.common.area_name
        );
    }

    async fn quit_route(&self) {}

    async fn get_coords_post_init(&self) -> Result<Vec<Location>, DispatchError> {
        self.common.persist_init_complete().await?;
        Ok(vec![])
    }

    fn check_coords_before_returning(&self, _lat: f64, _lng: f64) -> bool {
        true
    }

    async fn recalc_route_workertype(
        &self,
        coords_raw: &[Location],
    ) -> Result<Vec<Location>, DispatchError> {
        Ok(coords_raw.to_vec())
    }

    fn get_coords_after_finish_route(&self) -> bool {
        false
    }

    fn cluster_priority_queue_criteria(&self) -> (f64, f64) {
        (self.cluster_window_secs, self.cluster_window_meters)
    }

    fn priority_queue_update_interval(&self) -> Option<f64> {
        Some(self.update_interval_secs)
    }

    fn delete_coord_after_fetch(&self) -> bool {
        true
    }

    fn mode_name(&self) -> &str {
        &self.mode_name
    }
}
