use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::UserRecord;
use crate::session::{SecretStore, SessionError};

/// The persisted session slot: at most one JSON-encoded [`UserRecord`].
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SecretStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SecretStore>) -> Self {
        Self { backend }
    }

    /// Persist `user`, replacing any previous record.
    pub fn save(&self, user: &UserRecord) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(user).map_err(|e| {
            warn!(error = %e, email = %user.email(), "Failed to encode session");
            SessionError::WriteFailed(e.to_string())
        })?;

        self.backend.set(&encoded).map_err(|e| {
            warn!(error = %e, email = %user.email(), "Failed to save session");
            SessionError::WriteFailed(format!("{:#}", e))
        })?;

        info!(email = %user.email(), "Session saved");
        Ok(())
    }

    /// Stored record, or `None` if there is none or it can't be read.
    pub fn load(&self) -> Option<UserRecord> {
        match self.try_load() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Ignoring stored session");
                None
            }
        }
    }

    /// Like [`load`](Self::load) but reports read and decode failures.
    pub fn try_load(&self) -> Result<Option<UserRecord>, SessionError> {
        let raw = self
            .backend
            .get()
            .map_err(|e| SessionError::ReadFailed(format!("{:#}", e)))?;

        let Some(raw) = raw else {
            debug!("No stored session");
            return Ok(None);
        };

        let user: UserRecord =
            serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        debug!(email = %user.email(), "Stored session found");
        Ok(Some(user))
    }

    /// Remove the stored record. No-op if nothing is stored.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.backend.delete().map_err(|e| {
            warn!(error = %e, "Failed to clear session");
            SessionError::ClearFailed(format!("{:#}", e))
        })?;
        info!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::models::Role;
    use crate::session::MemorySecretStore;

    fn driver() -> UserRecord {
        UserRecord::new("2", "driver1@nusatoyotetsu.com", hash_password("driver123"), Role::Driver)
    }

    fn store() -> (Arc<MemorySecretStore>, SessionStore) {
        let backend = Arc::new(MemorySecretStore::new());
        (backend.clone(), SessionStore::new(backend))
    }

    #[test]
    fn test_save_then_load_returns_same_record() {
        let (_, store) = store();
        store.save(&driver()).unwrap();
        assert_eq!(store.load(), Some(driver()));
    }

    #[test]
    fn test_save_replaces_previous_record() {
        let (_, store) = store();
        let admin = UserRecord::new("1", "admin@nusatoyotetsu.com", hash_password("admin123"), Role::Admin);
        store.save(&admin).unwrap();
        store.save(&driver()).unwrap();
        assert_eq!(store.load(), Some(driver()));
    }

    #[test]
    fn test_load_empty() {
        let (_, store) = store();
        assert_eq!(store.load(), None);
        assert_eq!(store.try_load(), Ok(None));
    }

    #[test]
    fn test_clear_removes_record_and_is_idempotent() {
        let (backend, store) = store();
        store.save(&driver()).unwrap();

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        assert_eq!(backend.peek(), None);

        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_payload_loads_as_none() {
        let (backend, store) = store();
        backend.set("{not json").unwrap();

        assert_eq!(store.load(), None);
        assert!(matches!(store.try_load(), Err(SessionError::Corrupt(_))));
    }

    #[test]
    fn test_read_failure_is_reported() {
        let (backend, store) = store();
        store.save(&driver()).unwrap();
        backend.set_fail_reads(true);

        assert_eq!(store.load(), None);
        assert!(matches!(store.try_load(), Err(SessionError::ReadFailed(_))));
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let (backend, store) = store();
        backend.set_fail_writes(true);

        assert!(matches!(store.save(&driver()), Err(SessionError::WriteFailed(_))));
        assert!(matches!(store.clear(), Err(SessionError::ClearFailed(_))));
        assert_eq!(backend.peek(), None);
    }
}
