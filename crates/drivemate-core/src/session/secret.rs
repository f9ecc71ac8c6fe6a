//! Single-slot secret storage backends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use keyring::Entry;
use tracing::debug;

/// One secret value under one fixed key.
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` when nothing is stored.
    fn get(&self) -> Result<Option<String>>;

    /// Replace whatever is stored.
    fn set(&self, value: &str) -> Result<()>;

    /// Remove the value; succeeds if nothing is stored.
    fn delete(&self) -> Result<()>;
}

/// OS keychain slot (Keychain, Secret Service, Credential Manager).
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service: String,
    account: String,
}

impl KeyringSecretStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.account).context("Failed to create keyring entry")
    }
}

impl SecretStore for KeyringSecretStore {
    fn get(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, "No keychain entry");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to read from keychain"),
        }
    }

    fn set(&self, value: &str) -> Result<()> {
        self.entry()?
            .set_password(value)
            .context("Failed to store value in keychain")
    }

    fn delete(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete keychain entry"),
        }
    }
}

/// Process-local slot. Reads and writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    value: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `get` calls fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `set` and `delete` calls fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored value, bypassing failure injection.
    pub fn peek(&self) -> Option<String> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("secret store unavailable"));
        }
        Ok(self.slot().clone())
    }

    fn set(&self, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("secret store is read-only"));
        }
        *self.slot() = Some(value.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("secret store is read-only"));
        }
        *self.slot() = None;
        Ok(())
    }
}
