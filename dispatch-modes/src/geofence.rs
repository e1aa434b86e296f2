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

//! A minimal include-minus-exclude polygon geofence.

use dispatch_types::{GeofenceFilter, Location};

/// A ring of vertices tested with the even-odd rule.
pub type Polygon = Vec<Location>;

/// Keeps coordinates inside `include` and outside every ring in `exclude`.
/// An empty `include` means "everywhere".
#[derive(Debug, Clone, Default)]
pub struct PolygonGeofence {
    include: Vec<Polygon>,
    exclude: Vec<Polygon>,
}

impl PolygonGeofence {
    /// Build a geofence from include and exclude rings.
    pub fn new(include: Vec<Polygon>, exclude: Vec<Polygon>) -> Self {
        Self { include, exclude }
    }

    fn inside_any(point: &Location, polygons: &[Polygon]) -> bool {
        polygons.iter().any(|ring| point_in_ring(point, ring))
    }
}

/// Even-odd (ray casting) point-in-polygon test.
fn point_in_ring(point: &Location, ring: &[Location]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let vi = &ring[i];
        let vj = &ring[j];
        let crosses = (vi.lng > point.lng) != (vj.lng > point.lng)
            && point.lat
                < (vj.lat - vi.lat) * (point.lng - vi.lng) / (vj.lng - vi.lng) + vi.lat;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl GeofenceFilter for PolygonGeofence {
    fn filter(&self, coords: &[Location]) -> Vec<Location> {
        coords
            .iter()
            .filter(|c| {
                (self.include.is_empty() || Self::inside_any(c, &self.include))
                    && !Self::inside_any(c, &self.exclude)
            })
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        vec![
            Location::new(y0, x0),
            Location::new(y0, x1),
            Location::new(y1, x1),
            Location::new(y1, x0),
        ]
    }

    #[test]
    fn keeps_points_inside_include() {
        let fence = PolygonGeofence::new(vec![square(0.0, 0.0, 10.0, 10.0)], vec![]);
        let kept = fence.filter(&[Location::new(5.0, 5.0), Location::new(50.0, 50.0)]);
        assert_eq!(kept, vec![Location::new(5.0, 5.0)]);
    }

    #[test]
    fn drops_points_inside_exclude() {
        let fence = PolygonGeofence::new(
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![square(4.0, 4.0, 6.0, 6.0)],
        );
        let kept = fence.filter(&[Location::new(5.0, 5.0), Location::new(1.0, 1.0)]);
        assert_eq!(kept, vec![Location::new(1.0, 1.0)]);
    }

    #[test]
    fn empty_include_means_everywhere() {
        let fence = PolygonGeofence::default();
        let kept = fence.filter(&[Location::new(89.0, 179.0)]);
        assert_eq!(kept.len(), 1);
    }
}
