use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("tracking already active")]
    AlreadyActive,
    #[error("tracking not active")]
    NotActive,
}
