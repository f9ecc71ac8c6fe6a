//! Session persistence and the login/logout state machine.
//!
//! This module provides:
//! - `SecretStore`: a single keychain-style slot (`KeyringSecretStore`,
//!   `MemorySecretStore`)
//! - `SessionStore`: saves, loads and clears the logged-in `UserRecord`
//! - `SessionController`: serializes login/logout and publishes `SessionState`

pub mod controller;
pub mod error;
pub mod secret;
pub mod state;
pub mod store;

pub use controller::SessionController;
pub use error::SessionError;
pub use secret::{KeyringSecretStore, MemorySecretStore, SecretStore};
pub use state::{SessionFailure, SessionPhase, SessionState};
pub use store::SessionStore;
