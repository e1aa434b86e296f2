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

use serde::{Deserialize, Serialize};

/// Per-area dispatch configuration.
///
/// Constructed explicitly by the caller and passed into `RouteManager::new`
/// — there is no global parsed-args singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds offset used by mode hooks; presence enables the priority overlay.
    pub delay_after_prio_event: Option<f64>,
    /// If true, priority preempts without alternation.
    #[serde(default)]
    pub starve_route: bool,
    /// Drop priority events older than `now - value`; `0` disables the drop.
    #[serde(default)]
    pub remove_from_queue_backlog: f64,
    /// Number of init rounds before the post-init recalculation.
    #[serde(default = "default_init_mode_rounds")]
    pub init_mode_rounds: u32,
    /// Raw IV id list, passed through by `get_ids_iv`.
    #[serde(default)]
    pub mon_ids_iv_raw: Vec<i64>,
    /// Maximum radius passed to the route planner.
    pub max_radius: f64,
    /// Maximum coordinates per cluster passed to the route planner.
    pub max_per_cluster: u32,
    /// Route planner algorithm tag (e.g. `"optimized"`, `"quick"`).
    #[serde(default = "default_calctype")]
    pub calctype: String,
    /// Whether this area runs in "level" mode.
    #[serde(default)]
    pub level: bool,
    /// Idle-reaper timeout in seconds (defaults to 300).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: f64,
    /// Seconds between priority-queue background ticks; `None`/`0` disables it.
    pub priority_queue_update_interval_secs: Option<f64>,
}

fn default_init_mode_rounds() -> u32 {
    1
}

fn default_calctype() -> String {
    "optimized".to_string()
}

fn default_idle_timeout() -> f64 {
    300.0
}

/// A single area entry inside the persisted configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    /// Whether the area is still in its calibration phase.
    ///
    /// Declared before `name` so `serde_json::to_string_pretty` emits keys
    /// in stable alphabetical order.
    pub init: bool,
    /// Stable name of the area, matched against when flipping `init`.
    pub name: String,
}

/// The persisted configuration document: `{"areas": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaConfigDocument {
    /// All areas known to the persisted configuration.
    pub areas: Vec<AreaConfig>,
}
