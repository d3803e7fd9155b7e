use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Error code the positioning subsystem uses for a refused location permission.
pub const PERMISSION_DENIED: u16 = 1;

/// Opaque identifier of one registered position watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WatchHandle(u64);

impl WatchHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// Options requested from the positioning subsystem when a watch is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    /// Oldest cached fix the subsystem may hand back. Zero means always fresh.
    pub max_sample_age_ms: u64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 5000,
            max_sample_age_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionError {
    pub code: u16,
    pub message: String,
}

impl PositionError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.code == PERMISSION_DENIED
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "positioning error ({}): {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionEventKind {
    Fix(PositionSample),
    Failure(PositionError),
}

/// Something the positioning subsystem delivered for a given watch.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionEvent {
    pub handle: WatchHandle,
    pub kind: PositionEventKind,
}

pub type EventSink = UnboundedSender<PositionEvent>;

/// Continuous position watch provider.
///
/// Events for a watch are pushed into the sink handed over at subscription.
/// Nothing guarantees that delivery stops the instant `unsubscribe` returns, so
/// consumers must check the handle carried by each event.
pub trait Positioning {
    fn subscribe(&mut self, options: WatchOptions, sink: EventSink) -> WatchHandle;
    fn unsubscribe(&mut self, handle: WatchHandle);
}
