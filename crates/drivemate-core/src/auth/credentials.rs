use crate::auth::helper::hash_password;
use crate::models::{Role, UserRecord};

/// Source of known accounts.
///
/// The auth helper only ever needs a lookup by email, so a real backend can
/// replace the static list without touching validation or hashing.
pub trait CredentialSource: Send + Sync {
    /// Exact, case-sensitive lookup.
    fn find_by_email(&self, email: &str) -> Option<UserRecord>;
}

/// Fixed, read-only list of accounts held in memory.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    users: Vec<UserRecord>,
}

impl StaticCredentialStore {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// The built-in demo accounts: one admin, two drivers.
    pub fn seeded() -> Self {
        Self::new(vec![
            UserRecord::new("1", "admin@nusatoyotetsu.com", hash_password("admin123"), Role::Admin),
            UserRecord::new("2", "driver1@nusatoyotetsu.com", hash_password("driver123"), Role::Driver),
            UserRecord::new("3", "driver2@nusatoyotetsu.com", hash_password("driver123"), Role::Driver),
        ])
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }
}

impl Default for StaticCredentialStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl CredentialSource for StaticCredentialStore {
    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.iter().find(|u| u.email() == email).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_contents() {
        let store = StaticCredentialStore::seeded();
        assert_eq!(store.users().len(), 3);

        let admin = store.find_by_email("admin@nusatoyotetsu.com").unwrap();
        assert_eq!(admin.id(), "1");
        assert_eq!(admin.role(), Role::Admin);
        assert_eq!(admin.password_hash(), hash_password("admin123"));

        let drivers: Vec<_> = store.users().iter().filter(|u| u.role() == Role::Driver).collect();
        assert_eq!(drivers.len(), 2);
    }

    #[test]
    fn test_seeded_ids_and_emails_are_unique() {
        let store = StaticCredentialStore::seeded();
        let users = store.users();
        for (i, a) in users.iter().enumerate() {
            for b in &users[i + 1..] {
                assert_ne!(a.id(), b.id());
                assert_ne!(a.email(), b.email());
            }
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let store = StaticCredentialStore::seeded();
        assert!(store.find_by_email("Admin@nusatoyotetsu.com").is_none());
        assert!(store.find_by_email("nobody@nusatoyotetsu.com").is_none());
    }
}
