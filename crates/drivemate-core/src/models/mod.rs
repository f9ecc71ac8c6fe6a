//! Data models for DriveMate accounts.
//!
//! - `UserRecord`: an account known to the credential store, and the payload
//!   persisted to the session slot
//! - `Role`: what the account may see (admin or driver dashboards)

pub mod user;

pub use user::{Role, UserRecord};
