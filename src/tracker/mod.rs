mod error;
mod notice;
mod route;
mod session;
mod types;

pub use error::SessionError;
pub use notice::{ConsoleNotifier, Notice, Notifier};
pub use route::{Route, RouteObserver};
pub use session::SessionController;
pub use types::{PermissionDeniedPolicy, SessionStatus, TrackPoint, TrackingState};
