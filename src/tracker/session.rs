use log::{debug, info, warn};
use uuid::Uuid;

use super::error::SessionError;
use super::notice::{Notice, Notifier};
use super::route::{Route, RouteObserver};
use super::types::{PermissionDeniedPolicy, SessionStatus, TrackPoint, TrackingState};
use crate::positioning::{
    EventSink, PositionError, PositionEvent, PositionEventKind, Positioning, WatchHandle,
    WatchOptions,
};

/// Owns the tracking session: the single watch slot and the route.
///
/// The session is active exactly while a watch handle is held. Every event
/// coming back from the positioning subsystem is checked against that handle,
/// so fixes racing a `stop()` or left over from an earlier session are dropped.
pub struct SessionController<P> {
    positioning: P,
    sink: EventSink,
    options: WatchOptions,
    policy: PermissionDeniedPolicy,
    watch: Option<WatchHandle>,
    session: Option<Uuid>,
    route: Route,
    observers: Vec<Box<dyn RouteObserver>>,
    notifier: Box<dyn Notifier>,
}

impl<P: Positioning> SessionController<P> {
    pub fn new(positioning: P, sink: EventSink, notifier: Box<dyn Notifier>) -> Self {
        Self {
            positioning,
            sink,
            options: WatchOptions::default(),
            policy: PermissionDeniedPolicy::default(),
            watch: None,
            session: None,
            route: Route::new(),
            observers: Vec::new(),
            notifier,
        }
    }

    pub fn with_options(mut self, options: WatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_policy(mut self, policy: PermissionDeniedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn observe(&mut self, observer: Box<dyn RouteObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> TrackingState {
        if self.watch.is_some() {
            TrackingState::Active
        } else {
            TrackingState::Inactive
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Id of the running session, or of the last one once stopped.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session
    }

    pub fn positioning(&self) -> &P {
        &self.positioning
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state(),
            session: self.session,
            points: self.route.len(),
            last_point: self.route.last().copied(),
            route: self.route.clone(),
        }
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if let Some(handle) = self.watch {
            warn!("Start requested while {} is live", handle);
            self.notifier.notify(Notice::AlreadyActive);
            return Err(SessionError::AlreadyActive);
        }

        self.route.clear();
        self.route_changed();

        let handle = self.positioning.subscribe(self.options, self.sink.clone());
        let session = Uuid::new_v4();
        self.watch = Some(handle);
        self.session = Some(session);

        info!("Session {} started on {}", session, handle);
        self.notifier.notify(Notice::Started { session });
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), SessionError> {
        let Some(handle) = self.watch.take() else {
            warn!("Stop requested with no live watch");
            self.notifier.notify(Notice::NotActive);
            return Err(SessionError::NotActive);
        };

        self.end_session(handle);
        Ok(())
    }

    /// Applies one event from the positioning subsystem.
    pub fn handle_event(&mut self, event: PositionEvent) {
        if self.watch != Some(event.handle) {
            debug!("Ignoring late event from {}: {:?}", event.handle, event.kind);
            return;
        }

        match event.kind {
            PositionEventKind::Fix(sample) => self.on_sample(sample.into()),
            PositionEventKind::Failure(error) => self.on_sample_error(error),
        }
    }

    pub fn on_sample(&mut self, point: TrackPoint) {
        if !self.state().can_stop() {
            debug!("Ignoring fix while inactive: {:?}", point);
            return;
        }

        self.route.push(point);
        info!(
            "New point recorded: lat {}, lng {} ({} total)",
            point.latitude,
            point.longitude,
            self.route.len()
        );
        self.route_changed();
    }

    pub fn on_sample_error(&mut self, error: PositionError) {
        if !self.state().can_stop() {
            debug!("Ignoring error while inactive: {}", error);
            return;
        }

        if !error.is_permission_denied() {
            warn!("{}", error);
            return;
        }

        warn!("Location permission denied: {}", error.message);
        self.notifier.notify(Notice::PermissionDenied {
            message: error.message,
        });

        if self.policy == PermissionDeniedPolicy::Stop {
            if let Some(handle) = self.watch.take() {
                self.end_session(handle);
            }
        }
    }

    fn end_session(&mut self, handle: WatchHandle) {
        self.positioning.unsubscribe(handle);

        let points = self.route.len();
        info!("Tracking stopped on {}, {} points captured", handle, points);
        if let Some(session) = self.session {
            self.notifier.notify(Notice::Stopped { session, points });
        }
    }

    fn route_changed(&mut self) {
        for observer in &mut self.observers {
            observer.route_changed(&self.route);
        }
    }
}
