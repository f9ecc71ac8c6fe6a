//! DriveMate session core.
//!
//! Checks logins against the known account list, keeps the logged-in user in
//! the OS keychain, and publishes login/logout state for a front end to
//! render.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use drivemate_core::auth::{AuthHelper, StaticCredentialStore};
//! use drivemate_core::config::Config;
//! use drivemate_core::session::{KeyringSecretStore, SessionController, SessionStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let auth = AuthHelper::new(Arc::new(StaticCredentialStore::seeded()));
//! let store = SessionStore::new(Arc::new(KeyringSecretStore::new(
//!     config.keyring_service(),
//!     config.keyring_account(),
//! )));
//!
//! let session = SessionController::start(auth, store, config.persistence_policy);
//! if !session.wait_ready().await.is_logged_in() {
//!     session.login("driver1@nusatoyotetsu.com", "driver123").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod models;
pub mod session;
