//! Authentication against the known account list.
//!
//! This module provides:
//! - `CredentialSource`: lookup-by-email abstraction over the account list
//! - `StaticCredentialStore`: the fixed, in-memory account list
//! - `AuthHelper`: email/password validation, hashing and matching
//!
//! Nothing here performs I/O; persisting a successful login is the caller's job.

pub mod credentials;
pub mod error;
pub mod helper;

pub use credentials::{CredentialSource, StaticCredentialStore};
pub use error::AuthError;
pub use helper::{hash_password, is_valid_email, AuthHelper};
