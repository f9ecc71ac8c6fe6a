use serde::Serialize;
use thiserror::Error;

/// Session slot failures. Each variant carries the backend message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SessionError {
    #[error("Failed to save session: {0}")]
    WriteFailed(String),

    #[error("Failed to read session: {0}")]
    ReadFailed(String),

    #[error("Failed to clear session: {0}")]
    ClearFailed(String),

    #[error("Stored session is unreadable: {0}")]
    Corrupt(String),
}
