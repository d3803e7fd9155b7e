use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

use super::route::Route;
use crate::positioning::PositionSample;

/// One recorded position. Never mutated once appended to a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: i64,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms,
        }
    }

    pub fn lat_lng(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<PositionSample> for TrackPoint {
    fn from(sample: PositionSample) -> Self {
        Self::new(sample.latitude, sample.longitude, sample.timestamp_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TrackingState {
    Inactive,
    Active,
}

impl TrackingState {
    pub fn can_start(&self) -> bool {
        matches!(self, TrackingState::Inactive)
    }

    pub fn can_stop(&self) -> bool {
        matches!(self, TrackingState::Active)
    }
}

/// What the controller does when the positioning subsystem reports that
/// location permission was refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PermissionDeniedPolicy {
    /// Show the notice and leave the session active.
    #[default]
    KeepActive,
    /// Show the notice and end the session, keeping the route.
    Stop,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub state: TrackingState,
    pub session: Option<Uuid>,
    pub points: usize,
    pub last_point: Option<TrackPoint>,
    pub route: Route,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_coordinates_outside_their_domain() {
        assert!(TrackPoint::new(-90.0, 180.0, 0).is_valid());
        assert!(!TrackPoint::new(90.5, 0.0, 0).is_valid());
        assert!(!TrackPoint::new(0.0, -180.5, 0).is_valid());
        assert!(!TrackPoint::new(f64::NAN, 0.0, 0).is_valid());
    }

    #[test]
    fn timestamp_converts_to_utc() {
        let point = TrackPoint::new(0.0, 0.0, 1_700_000_000_123);
        let at = point.recorded_at().unwrap();
        assert_eq!(at.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn state_drives_control_enablement() {
        assert!(TrackingState::Inactive.can_start());
        assert!(!TrackingState::Inactive.can_stop());
        assert!(TrackingState::Active.can_stop());
        assert!(!TrackingState::Active.can_start());
        assert_eq!(TrackingState::Active.to_string(), "ACTIVE");
        assert_eq!(
            serde_json::to_string(&TrackingState::Inactive).unwrap(),
            "\"INACTIVE\""
        );
    }
}
