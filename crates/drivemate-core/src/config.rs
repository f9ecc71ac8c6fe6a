//! Application configuration management.
//!
//! Holds the name of the keychain slot used for the session, the persistence
//! policy, and the last email used to log in.
//!
//! Configuration is stored at `~/.config/drivemate/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "drivemate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Keychain service the session slot lives under
pub const DEFAULT_KEYRING_SERVICE: &str = "com.drivemate.auth";

/// Keychain account (key) of the session slot
pub const DEFAULT_KEYRING_ACCOUNT: &str = "com.drivemate.loggedInUser";

/// What a login does when the session can't be written to the keychain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// The login fails and the user stays logged out.
    #[default]
    Strict,
    /// The user is logged in for this process only; the failure is reported.
    BestEffort,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub keyring_service: Option<String>,
    pub keyring_account: Option<String>,
    #[serde(default)]
    pub persistence_policy: PersistencePolicy,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_json(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    pub fn keyring_service(&self) -> &str {
        self.keyring_service.as_deref().unwrap_or(DEFAULT_KEYRING_SERVICE)
    }

    pub fn keyring_account(&self) -> &str {
        self.keyring_account.as_deref().unwrap_or(DEFAULT_KEYRING_ACCOUNT)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.keyring_service(), DEFAULT_KEYRING_SERVICE);
        assert_eq!(config.keyring_account(), DEFAULT_KEYRING_ACCOUNT);
        assert_eq!(config.persistence_policy, PersistencePolicy::Strict);
        assert!(config.last_email.is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"persistence_policy": "best_effort"}"#).unwrap();
        assert_eq!(config.persistence_policy, PersistencePolicy::BestEffort);
        assert_eq!(config.keyring_account(), DEFAULT_KEYRING_ACCOUNT);
    }

    #[test]
    fn test_from_json_overrides() {
        let json = r#"{
            "keyring_service": "test.service",
            "keyring_account": "test.account",
            "last_email": "driver2@nusatoyotetsu.com"
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.keyring_service(), "test.service");
        assert_eq!(config.keyring_account(), "test.account");
        assert_eq!(config.last_email.as_deref(), Some("driver2@nusatoyotetsu.com"));
    }

    #[test]
    fn test_from_json_rejects_unknown_policy() {
        assert!(Config::from_json(r#"{"persistence_policy": "yolo"}"#).is_err());
    }
}
