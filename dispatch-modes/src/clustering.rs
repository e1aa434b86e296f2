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

//! Priority-event clustering: merge events that are close in both time and
//! space. The haversine distance used here is local to this module — the
//! dispatcher core itself never computes geodesic distance.

use dispatch_types::{ClusteringHelper, Location, PriorityEvent};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

fn haversine_meters(a: &Location, b: &Location) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Merges priority events within `(window_seconds, window_meters)` of one
/// another, keeping the earliest `due_at` of each cluster.
#[derive(Debug, Clone, Copy)]
pub struct WindowClustering {
    window_seconds: f64,
    window_meters: f64,
}

impl WindowClustering {
    /// Build a clustering helper with the given window.
    pub fn new(window_seconds: f64, window_meters: f64) -> Self {
        Self {
            window_seconds,
            window_meters,
        }
    }
}

impl ClusteringHelper for WindowClustering {
    fn get_clustered(&self, events: Vec<PriorityEvent>) -> Vec<PriorityEvent> {
        if self.window_seconds <= 0.0 && self.window_meters <= 0.0 {
            return events;
        }
        let mut clusters: Vec<PriorityEvent> = Vec::new();
        'event: for event in events {
            for kept in clusters.iter_mut() {
                let close_in_time = (event.due_at - kept.due_at).abs() <= self.window_seconds;
                let close_in_space =
                    haversine_meters(&event.location, &kept.location) <= self.window_meters;
                if close_in_time && close_in_space {
                    if event.due_at < kept.due_at {
                        *kept = event;
                    }
                    continue 'event;
                }
            }
            clusters.push(event);
        }
        clusters
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn loc(n: f64) -> Location {
        Location::new(n, n)
    }

    #[test]
    fn merges_events_within_window() {
        let clustering = WindowClustering::new(60.0, 10_000.0);
        let events = vec![
            PriorityEvent::new(100.0, loc(0.0), 0),
            PriorityEvent::new(110.0, loc(0.0001), 1),
        ];
        let merged = clustering.get_clustered(events);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].due_at, 100.0);
    }

    #[test]
    fn keeps_far_events_separate() {
        let clustering = WindowClustering::new(60.0, 100.0);
        let events = vec![
            PriorityEvent::new(100.0, loc(0.0), 0),
            PriorityEvent::new(110.0, loc(10.0), 1),
        ];
        assert_eq!(clustering.get_clustered(events).len(), 2);
    }

    #[test]
    fn zero_window_disables_clustering() {
        let clustering = WindowClustering::new(0.0, 0.0);
        let events = vec![
            PriorityEvent::new(100.0, loc(0.0), 0),
            PriorityEvent::new(100.0, loc(0.0), 1),
        ];
        assert_eq!(clustering.get_clustered(events).len(), 2);
    }
}
