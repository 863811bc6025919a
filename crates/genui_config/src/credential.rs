use std::{collections::HashMap, sync::RwLock};

use tracing::debug;

/// Keychain service every genui credential is stored under
pub const KEYCHAIN_SERVICE: &str = "genui";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access keychain entry '{key}': {reason}")]
    Keychain { key: String, reason: String },
    #[error("Credential store is unavailable: {0}")]
    Unavailable(String),
}

/// Persistent key-value storage for API credentials
pub trait CredentialStore: Send + Sync {
    /// Returns the stored value, `None` when nothing is stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the value under `key`, succeeding when there was none
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Stores credentials as passwords in the system keychain
#[derive(Debug, Clone, Default)]
pub struct KeychainStore;

impl KeychainStore {
    fn entry(key: &str) -> Result<keyring::Entry, StoreError> {
        keyring::Entry::new(KEYCHAIN_SERVICE, key).map_err(|e| StoreError::Keychain {
            key: key.into(),
            reason: format!("failed to create keychain entry: {e}"),
        })
    }
}

impl CredentialStore for KeychainStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match Self::entry(key)?.get_password() {
            Ok(val) => Ok(Some(val)),
            Err(keyring::Error::NoEntry) => {
                debug!("No value stored in keychain service=\"{KEYCHAIN_SERVICE}\", user=\"{key}\"");
                Ok(None)
            }
            Err(e) => Err(StoreError::Keychain {
                key: key.into(),
                reason: e.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::entry(key)?
            .set_password(value)
            .map_err(|e| StoreError::Keychain {
                key: key.into(),
                reason: format!("failed to store password: {e}"),
            })?;

        debug!("Value stored in keychain service=\"{KEYCHAIN_SERVICE}\", user=\"{key}\"");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => {
                debug!("No value stored in keychain matching service=\"{KEYCHAIN_SERVICE}\", user=\"{key}\"");
                Ok(())
            }
            Err(e) => Err(StoreError::Keychain {
                key: key.into(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Process-local store, used by `serve` once the key is resolved and by tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value.into());
        }
        self
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .insert(key.into(), value.into());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .remove(key);
        Ok(())
    }
}
