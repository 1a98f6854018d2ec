//! Secret vault abstraction addressed by (namespace, account) pairs.
//!
//! Implementations:
//! - `KeyringVault` — OS keychain (see `core::keyring_vault`)
//! - `MemoryVault` — in-process map for tests and embedding

use crate::core::error::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// An opaque key-value secret store.
///
/// `get` reports an absent secret as `Ok(None)`; `delete` of an absent
/// secret is a hard failure (`StoreError::NotFound`). Callers rely on that
/// asymmetry: the vault is the source of truth for existence.
pub trait SecretVault {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    fn get(&self, namespace: &str, account: &str) -> StoreResult<Option<String>>;

    fn set(&self, namespace: &str, account: &str, secret: &str) -> StoreResult<()>;

    fn delete(&self, namespace: &str, account: &str) -> StoreResult<()>;
}

impl<V: SecretVault + ?Sized> SecretVault for &V {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, namespace: &str, account: &str) -> StoreResult<Option<String>> {
        (**self).get(namespace, account)
    }

    fn set(&self, namespace: &str, account: &str, secret: &str) -> StoreResult<()> {
        (**self).set(namespace, account, secret)
    }

    fn delete(&self, namespace: &str, account: &str) -> StoreResult<()> {
        (**self).delete(namespace, account)
    }
}

type SecretKey = (String, String);

/// In-memory vault. Secrets are lost when the vault is dropped.
#[derive(Debug, Default)]
pub struct MemoryVault {
    secrets: RwLock<HashMap<SecretKey, String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored secrets, including the metadata record.
    pub fn len(&self) -> usize {
        self.secrets.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("memory vault lock poisoned".into())
}

impl SecretVault for MemoryVault {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, namespace: &str, account: &str) -> StoreResult<Option<String>> {
        let secrets = self.secrets.read().map_err(|_| poisoned())?;
        Ok(secrets
            .get(&(namespace.to_string(), account.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, account: &str, secret: &str) -> StoreResult<()> {
        let mut secrets = self.secrets.write().map_err(|_| poisoned())?;
        secrets.insert(
            (namespace.to_string(), account.to_string()),
            secret.to_string(),
        );
        Ok(())
    }

    fn delete(&self, namespace: &str, account: &str) -> StoreResult<()> {
        let mut secrets = self.secrets.write().map_err(|_| poisoned())?;
        match secrets.remove(&(namespace.to_string(), account.to_string())) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(namespace, account)),
        }
    }
}
