use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::models::UserRecord;
use crate::session::SessionError;

/// Where the session controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    CheckingSession,
    LoggedOut,
    LoggingIn,
    LoggedIn,
    LoggingOut,
}

/// A failed session operation, as published to observers.
///
/// `Display` is the message to show the user.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(tag = "kind", content = "detail")]
pub enum SessionFailure {
    #[error("Email and password are required.")]
    MissingCredentials,

    #[error("Already logged in as {0}. Log out first.")]
    AlreadyLoggedIn(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Persistence(#[from] SessionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Snapshot of the session, published on every transition.
/// Serializes camelCase for a webview front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: SessionPhase,
    pub current_user: Option<UserRecord>,
    pub is_loading: bool,
    pub is_checking_session: bool,
    pub last_error: Option<SessionFailure>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub(crate) fn checking() -> Self {
        Self {
            phase: SessionPhase::CheckingSession,
            is_checking_session: true,
            ..Self::default()
        }
    }

    pub(crate) fn logged_out(error: Option<SessionFailure>) -> Self {
        Self {
            phase: SessionPhase::LoggedOut,
            last_error: error,
            ..Self::default()
        }
    }

    pub(crate) fn logging_in() -> Self {
        Self {
            phase: SessionPhase::LoggingIn,
            is_loading: true,
            ..Self::default()
        }
    }

    pub(crate) fn logged_in(user: UserRecord, error: Option<SessionFailure>) -> Self {
        Self {
            phase: SessionPhase::LoggedIn,
            current_user: Some(user),
            last_error: error,
            logged_in_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub(crate) fn logging_out(&self) -> Self {
        Self {
            phase: SessionPhase::LoggingOut,
            is_loading: true,
            ..self.clone()
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.phase == SessionPhase::LoggedIn && self.current_user.is_some()
    }

    /// Restore check or a login/logout is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Uninitialized
                | SessionPhase::CheckingSession
                | SessionPhase::LoggingIn
                | SessionPhase::LoggingOut
        )
    }

    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(|e| e.to_string())
    }
}
