mod scripted;
mod types;

pub use scripted::ScriptedPositioning;
pub use types::{
    EventSink, PositionError, PositionEvent, PositionEventKind, PositionSample, Positioning,
    WatchHandle, WatchOptions, PERMISSION_DENIED,
};
