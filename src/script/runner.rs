use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{sleep_until, Instant};

use super::parser::{Action, Script};
use crate::config::Config;
use crate::positioning::{PositionError, PositionEvent, PositionSample, ScriptedPositioning};
use crate::tracker::{Notifier, RouteObserver, SessionController, SessionStatus};

/// Replays a script against a session controller backed by the scripted
/// positioning subsystem.
pub struct Runner {
    script: Script,
    controller: SessionController<ScriptedPositioning>,
    events: UnboundedReceiver<PositionEvent>,
}

impl Runner {
    pub fn new(script: Script, config: &Config, notifier: Box<dyn Notifier>) -> Self {
        let (sink, events) = mpsc::unbounded_channel();
        let controller = SessionController::new(ScriptedPositioning::new(), sink, notifier)
            .with_options(config.watch)
            .with_policy(config.permission_denied);

        Self {
            script,
            controller,
            events,
        }
    }

    pub fn observe(&mut self, observer: Box<dyn RouteObserver>) {
        self.controller.observe(observer);
    }

    pub async fn run(mut self) -> SessionStatus {
        let start = Utc::now();
        let steps = std::mem::take(&mut self.script.steps);
        info!("Replaying {} steps from {}", steps.len(), start);

        for (i, step) in steps.iter().enumerate() {
            if let Some(time) = &step.time {
                match time.resolve(start) {
                    Some(at) => self.wait_until(at).await,
                    None => {
                        warn!("Step {}: time {} is out of range, skipping", i, time);
                        continue;
                    }
                }
            }
            self.deliver_pending();
            self.apply(i, &step.action);
        }

        tokio::task::yield_now().await;
        self.deliver_pending();

        let status = self.controller.status();
        info!(
            "Replay finished: {} with {} points",
            status.state, status.points
        );
        status
    }

    /// Sleeps until `at`, applying positioning events as they come in.
    async fn wait_until(&mut self, at: DateTime<Utc>) {
        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        let deadline = Instant::now() + delay;

        loop {
            tokio::select! {
                _ = sleep_until(deadline) => return,
                Some(event) = self.events.recv() => self.controller.handle_event(event),
            }
        }
    }

    fn deliver_pending(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.controller.handle_event(event);
        }
    }

    fn apply(&mut self, i: usize, action: &Action) {
        debug!("Step {}: {}", i, action.name());

        match action {
            Action::Start => {
                if let Err(e) = self.controller.start() {
                    debug!("Step {} rejected: {}", i, e);
                }
            }
            Action::Stop => {
                if let Err(e) = self.controller.stop() {
                    debug!("Step {} rejected: {}", i, e);
                }
            }
            Action::Fix {
                latitude,
                longitude,
                timestamp_ms,
            } => {
                let sample = PositionSample {
                    latitude: *latitude,
                    longitude: *longitude,
                    timestamp_ms: timestamp_ms.unwrap_or_else(|| Utc::now().timestamp_millis()),
                };
                self.controller.positioning().emit_fix(sample);
            }
            Action::Error { code, message } => {
                self.controller
                    .positioning()
                    .emit_error(PositionError::new(*code, message.clone()));
            }
        }
    }
}
