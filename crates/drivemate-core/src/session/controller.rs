//! Session controller: the single owner of login/logout state.
//!
//! Every operation (startup restore, login, logout) runs under one async
//! mutex held until its state has been published, so the keychain slot and
//! the published [`SessionState`] always change together. Hashing and
//! keychain I/O run on tokio's blocking pool. Observers follow the state
//! through a `watch` channel and decide for themselves where to consume it.

use std::sync::Arc;

use tokio::sync::{watch, Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use crate::auth::AuthHelper;
use crate::config::PersistencePolicy;
use crate::models::UserRecord;
use crate::session::{SessionError, SessionFailure, SessionPhase, SessionState, SessionStore};

struct Inner {
    auth: AuthHelper,
    store: SessionStore,
    policy: PersistencePolicy,
    op_lock: Arc<Mutex<()>>,
    state_tx: watch::Sender<SessionState>,
}

/// Orchestrates the auth helper and the session store.
/// Clone is cheap; clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

/// Run a blocking closure on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, SessionFailure>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "Blocking session task failed");
        SessionFailure::Internal(e.to_string())
    })
}

impl SessionController {
    /// Create the controller and start restoring any saved session.
    ///
    /// Returns immediately with the state at `CheckingSession`; the restore
    /// runs on a spawned task. Must be called from within a tokio runtime.
    pub fn start(auth: AuthHelper, store: SessionStore, policy: PersistencePolicy) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        let op_lock = Arc::new(Mutex::new(()));

        // Taken before spawning so no login can slip in ahead of the restore.
        let guard = op_lock.clone().try_lock_owned().ok();

        let controller = Self {
            inner: Arc::new(Inner {
                auth,
                store,
                policy,
                op_lock,
                state_tx,
            }),
        };
        controller.publish(SessionState::checking());

        let task = controller.clone();
        tokio::spawn(async move {
            task.restore(guard).await;
        });

        controller
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.inner.state_tx.borrow().current_user.clone()
    }

    /// Wait for the startup restore to finish and return the state it left.
    pub async fn wait_ready(&self) -> SessionState {
        let mut rx = self.subscribe();
        let ready = rx
            .wait_for(|s| {
                !matches!(
                    s.phase,
                    SessionPhase::Uninitialized | SessionPhase::CheckingSession
                )
            })
            .await
            .map(|s| s.clone());

        match ready {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Log in with email and password.
    ///
    /// Empty input is rejected before the auth helper runs and only sets
    /// `last_error`. On success the user is persisted and published as
    /// `LoggedIn`; on failure the state is `LoggedOut` with the error.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, SessionFailure> {
        let _guard = self.inner.op_lock.lock().await;

        if email.is_empty() || password.is_empty() {
            warn!("Login rejected: email or password missing");
            let failure = SessionFailure::MissingCredentials;
            self.inner
                .state_tx
                .send_modify(|s| s.last_error = Some(failure.clone()));
            return Err(failure);
        }

        if let Some(user) = self.current_user() {
            warn!(email = %user.email(), "Login rejected: already logged in");
            return Err(SessionFailure::AlreadyLoggedIn(user.email().to_string()));
        }

        info!(email = %email, "Logging in");
        self.publish(SessionState::logging_in());

        let auth = self.inner.auth.clone();
        let (email, password) = (email.to_string(), password.to_string());
        let checked = run_blocking(move || auth.login(&email, &password))
            .await
            .and_then(|r| r.map_err(SessionFailure::from));

        let user = match checked {
            Ok(user) => user,
            Err(failure) => {
                warn!(error = %failure, "Login failed");
                self.publish(SessionState::logged_out(Some(failure.clone())));
                return Err(failure);
            }
        };

        let store = self.inner.store.clone();
        let record = user.clone();
        let saved = run_blocking(move || store.save(&record))
            .await
            .and_then(|r| r.map_err(SessionFailure::from));

        match (saved, self.inner.policy) {
            (Ok(()), _) => {
                self.publish(SessionState::logged_in(user.clone(), None));
            }
            (Err(failure), PersistencePolicy::BestEffort) => {
                warn!(error = %failure, "Session not persisted; keeping in-memory login");
                self.publish(SessionState::logged_in(user.clone(), Some(failure)));
            }
            (Err(failure), PersistencePolicy::Strict) => {
                error!(error = %failure, "Session not persisted; login aborted");
                self.publish(SessionState::logged_out(Some(failure.clone())));
                return Err(failure);
            }
        }

        info!(email = %user.email(), role = %user.role(), "Login successful");
        Ok(user)
    }

    /// Log out: clear the stored session and reset to `LoggedOut`.
    ///
    /// The state always ends `LoggedOut`. If the keychain could not be
    /// cleared the failure is returned and kept in `last_error`.
    pub async fn logout(&self) -> Result<(), SessionFailure> {
        let _guard = self.inner.op_lock.lock().await;

        info!(email = ?self.current_user().map(|u| u.email().to_string()), "Logging out");
        self.publish(self.state().logging_out());

        let store = self.inner.store.clone();
        let cleared = run_blocking(move || store.clear())
            .await
            .and_then(|r| r.map_err(SessionFailure::from));

        match cleared {
            Ok(()) => {
                self.publish(SessionState::logged_out(None));
                info!("Logout complete");
                Ok(())
            }
            Err(failure) => {
                error!(error = %failure, "Logout could not clear the stored session");
                self.publish(SessionState::logged_out(Some(failure.clone())));
                Err(failure)
            }
        }
    }

    async fn restore(&self, guard: Option<OwnedMutexGuard<()>>) {
        let _guard = match guard {
            Some(guard) => guard,
            None => self.inner.op_lock.clone().lock_owned().await,
        };

        let store = self.inner.store.clone();
        let loaded = run_blocking(move || store.try_load())
            .await
            .and_then(|r| r.map_err(SessionFailure::from));

        match loaded {
            Ok(Some(user)) if self.inner.auth.is_known_record(&user) => {
                info!(email = %user.email(), "Restored saved session");
                self.publish(SessionState::logged_in(user, None));
            }
            Ok(Some(user)) => {
                warn!(email = %user.email(), "Saved session doesn't match a known account; discarding");
                let error = self.discard_saved().await;
                self.publish(SessionState::logged_out(error));
            }
            Ok(None) => {
                debug!("No saved session");
                self.publish(SessionState::logged_out(None));
            }
            Err(failure @ SessionFailure::Persistence(SessionError::Corrupt(_))) => {
                warn!(error = %failure, "Saved session is unreadable; discarding");
                let error = self.discard_saved().await.unwrap_or(failure);
                self.publish(SessionState::logged_out(Some(error)));
            }
            Err(failure) => {
                // The slot may still hold a record; leave it for a later logout.
                error!(error = %failure, "Could not check for a saved session");
                self.publish(SessionState::logged_out(Some(failure)));
            }
        }
    }

    /// Clear the slot during restore. Returns the failure, if any.
    async fn discard_saved(&self) -> Option<SessionFailure> {
        let store = self.inner.store.clone();
        let cleared = run_blocking(move || store.clear())
            .await
            .and_then(|r| r.map_err(SessionFailure::from));

        match cleared {
            Ok(()) => None,
            Err(failure) => {
                warn!(error = %failure, "Failed to discard saved session");
                Some(failure)
            }
        }
    }

    fn publish(&self, state: SessionState) {
        debug!(phase = ?state.phase, "Session state");
        self.inner.state_tx.send_replace(state);
    }
}
