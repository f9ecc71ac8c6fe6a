use serde::Serialize;
use thiserror::Error;

/// Why a credential check was rejected. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AuthError {
    #[error("Invalid email address.")]
    InvalidEmailFormat,

    #[error("Password must not be empty.")]
    EmptyPassword,

    #[error("Account not found! Please contact HR at PT Nusa Toyotetsu.")]
    NoMatchingAccount,
}
