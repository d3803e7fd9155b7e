use log::{error, info, warn};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A message the user has to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    Started { session: Uuid },
    Stopped { session: Uuid, points: usize },
    AlreadyActive,
    NotActive,
    PermissionDenied { message: String },
}

impl Notice {
    /// Blocking notices need an explicit acknowledgement from the user.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Notice::PermissionDenied { .. })
    }

    pub fn is_misuse(&self) -> bool {
        matches!(self, Notice::AlreadyActive | Notice::NotActive)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Started { .. } => write!(f, "Started tracking your trip."),
            Notice::Stopped { points, .. } => write!(
                f,
                "Tracking stopped. {} points captured in the current session.",
                points
            ),
            Notice::AlreadyActive => write!(f, "Tracking is already active!"),
            Notice::NotActive => write!(f, "Tracking is not currently active."),
            Notice::PermissionDenied { .. } => write!(
                f,
                "Location permission denied. Please grant access in your device settings."
            ),
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Prints notices on stderr, with blocking ones set apart.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        if notice.is_blocking() {
            error!("Blocking notice: {:?}", notice);
            eprintln!("!!! {}", notice);
        } else if notice.is_misuse() {
            warn!("Rejected command: {:?}", notice);
            eprintln!("{}", notice);
        } else {
            info!("{:?}", notice);
            eprintln!("{}", notice);
        }
    }
}
