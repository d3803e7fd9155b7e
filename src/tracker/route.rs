use serde::Serialize;

use super::types::TrackPoint;

/// Points of one session in the order they were recorded.
///
/// Only the session controller can append to or clear a route; everyone else
/// gets a shared view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Route {
    points: Vec<TrackPoint>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&TrackPoint> {
        self.points.last()
    }

    /// Path to draw, as (lat, lng) pairs.
    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(TrackPoint::lat_lng).collect()
    }

    pub(super) fn push(&mut self, point: TrackPoint) {
        self.points.push(point);
    }

    pub(super) fn clear(&mut self) {
        self.points.clear();
    }
}

impl FromIterator<TrackPoint> for Route {
    fn from_iter<I: IntoIterator<Item = TrackPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Told about every change the controller makes to its route.
pub trait RouteObserver {
    fn route_changed(&mut self, route: &Route);
}
