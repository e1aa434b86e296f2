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

use thiserror::Error;

/// Errors surfaced across the geodispatch workspace.
///
/// Control-flow outcomes that are expected, non-fatal parts of normal
/// operation (invalid coordinates, an empty route, unregistering an unknown
/// worker, a duplicate registration, idle eviction) are never represented
/// here — they are communicated through `bool`/`Option` return values
/// instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The route planner failed to produce a traversal.
    #[error("route planner failed: {0}")]
    Planner(String),
    /// The geofence filter failed to evaluate.
    #[error("geofence filter failed: {0}")]
    Geofence(String),
    /// Reading or writing persisted configuration failed.
    #[error("persisted configuration I/O failed: {0}")]
    ConfigIo(#[from] std::io::Error),
    /// The persisted configuration could not be parsed.
    #[error("persisted configuration is malformed: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
