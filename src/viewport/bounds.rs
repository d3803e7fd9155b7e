use serde::Serialize;

use crate::tracker::TrackPoint;

/// Smallest latitude/longitude rectangle enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn from_points(points: &[TrackPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut bounds = BoundingBox {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };
        for p in rest {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lng = bounds.min_lng.min(p.longitude);
            bounds.max_lng = bounds.max_lng.max(p.longitude);
        }

        Some(bounds)
    }

    pub fn south_west(&self) -> (f64, f64) {
        (self.min_lat, self.min_lng)
    }

    pub fn north_east(&self) -> (f64, f64) {
        (self.max_lat, self.max_lng)
    }
}
