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

/// A single geographic coordinate.
///
/// Equality and hashing are by value. Latitude/longitude are stored as `f64`
/// rather than an ordered float, since a `Location` is never used as a
/// priority-queue key (only [`PriorityEvent`](crate::PriorityEvent) is).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees, valid in `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, valid in `[-180, 180]`.
    pub lng: f64,
}

impl Location {
    /// Create a new location without validating it.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` iff both coordinates fall within their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl Eq for Location {}

impl std::hash::Hash for Location {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lat.to_bits().hash(state);
        self.lng.to_bits().hash(state);
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_range() {
        assert!(Location::new(0.0, 0.0).is_valid());
        assert!(Location::new(90.0, 180.0).is_valid());
        assert!(Location::new(-90.0, -180.0).is_valid());
    }

    #[test]
    fn invalid_range() {
        assert!(!Location::new(90.1, 0.0).is_valid());
        assert!(!Location::new(0.0, 180.1).is_valid());
        assert!(!Location::new(-90.1, 0.0).is_valid());
        assert!(!Location::new(0.0, -180.1).is_valid());
    }

    #[test]
    fn hash_matches_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Location::new(1.0, 2.0));
        assert!(set.contains(&Location::new(1.0, 2.0)));
    }
}
