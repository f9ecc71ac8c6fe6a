//! Credential check: validate input, hash the password, match an account.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::auth::{AuthError, CredentialSource};
use crate::models::UserRecord;

/// Basic `local@domain.tld` shape; TLD is 2 to 64 letters.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$")
        .expect("email pattern is a valid regex")
});

/// Lowercase hex SHA-256 of the UTF-8 password bytes.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Matches email/password pairs against a [`CredentialSource`].
///
/// Pure lookup: no persistence, no state. Clone is cheap.
#[derive(Clone)]
pub struct AuthHelper {
    source: Arc<dyn CredentialSource>,
}

impl AuthHelper {
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self { source }
    }

    /// Check a login attempt.
    ///
    /// Email format is checked before the password, so a malformed email
    /// always yields `InvalidEmailFormat`.
    pub fn login(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        debug!(email = %email, "Checking credentials");

        if !is_valid_email(email) {
            warn!(email = %email, "Rejected login: invalid email format");
            return Err(AuthError::InvalidEmailFormat);
        }

        if password.is_empty() {
            warn!(email = %email, "Rejected login: empty password");
            return Err(AuthError::EmptyPassword);
        }

        let hashed = hash_password(password);

        // Re-check the email: a source may match case-insensitively, but
        // login is exact.
        match self.source.find_by_email(email) {
            Some(user) if user.email() == email && user.password_hash() == hashed => {
                info!(email = %user.email(), role = %user.role(), "Credentials accepted");
                Ok(user)
            }
            _ => {
                warn!(email = %email, "Rejected login: no matching account");
                Err(AuthError::NoMatchingAccount)
            }
        }
    }

    /// True if `user` is, field for field, an account the source knows.
    pub fn is_known_record(&self, user: &UserRecord) -> bool {
        self.source
            .find_by_email(user.email())
            .is_some_and(|known| &known == user)
    }
}
