use log::{debug, info, warn};

use super::types::{
    EventSink, PositionError, PositionEvent, PositionEventKind, PositionSample, Positioning,
    WatchHandle, WatchOptions,
};

#[derive(Debug)]
struct Watch {
    handle: WatchHandle,
    sink: EventSink,
}

/// Positioning subsystem fed by a replay script instead of a sensor.
///
/// Fixes and errors are only forwarded while a watch is registered; anything
/// emitted with no watch is dropped, the same way a real sensor stays silent.
#[derive(Debug, Default)]
pub struct ScriptedPositioning {
    next_id: u64,
    watch: Option<Watch>,
    requests: Vec<WatchOptions>,
}

impl ScriptedPositioning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Options of every subscription made so far, oldest first.
    pub fn requests(&self) -> &[WatchOptions] {
        &self.requests
    }

    pub fn emit_fix(&self, sample: PositionSample) -> bool {
        self.emit(PositionEventKind::Fix(sample))
    }

    pub fn emit_error(&self, error: PositionError) -> bool {
        self.emit(PositionEventKind::Failure(error))
    }

    fn emit(&self, kind: PositionEventKind) -> bool {
        let Some(watch) = &self.watch else {
            debug!("No watch registered, dropping {:?}", kind);
            return false;
        };

        watch
            .sink
            .send(PositionEvent {
                handle: watch.handle,
                kind,
            })
            .is_ok()
    }
}

impl Positioning for ScriptedPositioning {
    fn subscribe(&mut self, options: WatchOptions, sink: EventSink) -> WatchHandle {
        self.next_id += 1;
        let handle = WatchHandle::new(self.next_id);

        if let Some(previous) = self.watch.take() {
            warn!("Replacing {} with {}", previous.handle, handle);
        }

        info!(
            "Registered {} (high_accuracy={}, timeout={}ms, max_age={}ms)",
            handle, options.high_accuracy, options.timeout_ms, options.max_sample_age_ms
        );

        self.requests.push(options);
        self.watch = Some(Watch { handle, sink });
        handle
    }

    fn unsubscribe(&mut self, handle: WatchHandle) {
        match &self.watch {
            Some(watch) if watch.handle == handle => {
                self.watch = None;
                info!("Cleared {}", handle);
            }
            _ => debug!("Ignoring unsubscribe for unknown {}", handle),
        }
    }
}
