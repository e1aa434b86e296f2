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

//! # geodispatch
//!
//! A geographic route dispatcher: it builds a traversal route over a
//! geofenced pool of coordinates, partitions that route fairly among however
//! many worker clients are currently connected, and overlays a time-based
//! priority queue (with starvation rules) on top of the normal round-robin
//! dispatch.
//!
//! ## Structure
//! - `route_core` owns the dispatcher core (`RouteManager` and the C1-C8
//!   state machines) and is agnostic to how a route is planned, how
//!   coordinates are geofenced, or where priority events come from.
//! - `dispatch_modes` supplies concrete collaborators for those seams (an
//!   identity route planner, a polygon geofence, window-based event
//!   clustering, an in-memory event source, a JSON-backed persisted config
//!   store) plus the four concrete `ModeHooks` vtables.
//! - `dispatch_types` holds the plain data types (`Location`, `Settings`,
//!   `PriorityEvent`, ...) both of the above agree on.
//!
//! This crate itself is a thin demo binary ([`fixture`]) plus the
//! `geodispatch` CLI wiring in `main.rs`; the dispatcher logic lives in the
//! library crates above.

#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod fixture;

pub use dispatch_modes::{
    CachingPlanner, IdentityPlanner, InMemoryEventSource, JsonAreaConfigStore, PolygonGeofence,
    WindowClustering,
};
pub use dispatch_types::{
    AreaConfig, AreaConfigDocument, DispatchError, Location, PriorityEvent, Settings,
};
pub use route_core::{Clock, ModeHooks, PositionType, RouteManager, SystemClock, TestClock};
