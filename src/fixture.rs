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

//! Loads a JSON scenario file and wires it up into a running
//! [`RouteManager`], picking concrete collaborators from `dispatch_modes`.
//! There is no real network layer here — workers are simulated in-process,
//! since driving an actual worker's network connection is out of scope for
//! this dispatcher.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dispatch_modes::modes::{EncounterModeHooks, IvMitmHooks, PokestopsHooks};
use dispatch_modes::{IdentityPlanner, InMemoryEventSource, JsonAreaConfigStore, PolygonGeofence, WindowClustering};
use dispatch_types::{AreaConfig, AreaConfigDocument, DispatchError, Location, Settings};
use route_core::{ModeHooks, RouteManager, SystemClock};
use serde::Deserialize;

/// Which concrete mode vtable a fixture should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    /// `iv_mitm`: priority-only, no route consumption.
    IvMitm,
    /// `pokestops`: no priority queue, incrementally-discovered route.
    Pokestops,
    /// `mon_mitm`: cyclic route with a clustered encounter priority overlay.
    MonMitm,
    /// `raids_mitm`: cyclic route with a clustered raid priority overlay.
    RaidsMitm,
}

/// A demo scenario: an area's settings, its coordinate pool, and which mode
/// to dispatch it under.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Stable area name, also used as the persisted-config lookup key.
    pub area_name: String,
    /// Dispatch configuration for this area.
    pub settings: Settings,
    /// `(lat, lng)` pairs making up the raw coordinate pool.
    pub coords: Vec<(f64, f64)>,
    /// Whether the area starts in its calibration phase.
    #[serde(default)]
    pub init: bool,
    /// Which mode vtable to dispatch this area under.
    pub mode: ModeKind,
}

impl Fixture {
    /// Parse a fixture from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Build a runnable manager for this fixture. `config_path` is where the
    /// persisted area-config document lives (created if missing, with this
    /// area marked `init: true`).
    pub fn build_manager(&self, config_path: impl Into<PathBuf>) -> Result<RouteManager, DispatchError> {
        let config_path = config_path.into();
        if !config_path.exists() {
            let doc = AreaConfigDocument {
                areas: vec![AreaConfig { name: self.area_name.clone(), init: true }],
            };
            std::fs::write(&config_path, serde_json::to_string_pretty(&doc)?)?;
        }
        let config_store = Arc::new(JsonAreaConfigStore::new(config_path));
        let event_source = Arc::new(InMemoryEventSource::new());

        let mode_hooks: Arc<dyn ModeHooks> = match self.mode {
            ModeKind::IvMitm => Arc::new(IvMitmHooks::new(
                self.area_name.clone(),
                event_source,
                config_store,
                self.settings.priority_queue_update_interval_secs.unwrap_or(30.0),
            )),
            ModeKind::Pokestops => {
                Arc::new(PokestopsHooks::new(self.area_name.clone(), event_source, config_store))
            }
            ModeKind::MonMitm => Arc::new(EncounterModeHooks::new(
                self.area_name.clone(),
                "mon_mitm",
                event_source,
                config_store,
                self.settings.priority_queue_update_interval_secs.unwrap_or(30.0),
                60.0,
                100.0,
            )),
            ModeKind::RaidsMitm => Arc::new(EncounterModeHooks::new(
                self.area_name.clone(),
                "raids_mitm",
                event_source,
                config_store,
                self.settings.priority_queue_update_interval_secs.unwrap_or(30.0),
                60.0,
                100.0,
            )),
        };

        let coords = self.coords.iter().map(|(lat, lng)| Location::new(*lat, *lng)).collect();

        RouteManager::new(
            self.area_name.clone(),
            self.settings.clone(),
            coords,
            self.init,
            mode_hooks,
            Arc::new(IdentityPlanner),
            Arc::new(PolygonGeofence::default()),
            Arc::new(WindowClustering::new(60.0, 100.0)),
            Arc::new(SystemClock),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builds_a_manager_from_json() {
        let dir = std::env::temp_dir().join("geodispatch-fixture-test");
        let _ = std::fs::create_dir_all(&dir);
        let config_path = dir.join("mappings.json");
        let _ = std::fs::remove_file(&config_path);

        let json = r#"{
            "area_name": "zurich",
            "settings": {
                "delay_after_prio_event": null,
                "max_radius": 100.0,
                "max_per_cluster": 1,
                "priority_queue_update_interval_secs": null
            },
            "coords": [[47.36, 8.54], [47.37, 8.55]],
            "mode": "pokestops"
        }"#;
        let fixture: Fixture = serde_json::from_str(json).unwrap();
        let manager = fixture.build_manager(&config_path).unwrap();
        assert_eq!(manager.name(), "zurich");
    }
}
