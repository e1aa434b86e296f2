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

//! Shared plain data types for the geodispatch workspace.
//!
//! This crate contains no logic of its own beyond small invariant checks
//! (e.g. [`Location::is_valid`]). It exists so that `route-core` and
//! `dispatch-modes` can agree on wire/state types without either depending on
//! the other.

#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]

mod collaborators;
mod config;
mod error;
mod location;
mod pool;
mod priority;

pub use collaborators::{AreaConfigStore, ClusteringHelper, EventSource, GeofenceFilter, RoutePlanner};
pub use config::{AreaConfig, AreaConfigDocument, Settings};
pub use error::DispatchError;
pub use location::Location;
pub use pool::RoutePoolEntry;
pub use priority::PriorityEvent;
