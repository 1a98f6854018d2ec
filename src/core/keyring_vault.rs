//! OS keychain vault.
//!
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use crate::core::error::{StoreError, StoreResult};
use crate::core::vault::SecretVault;
use keyring::Entry;

/// Vault backed by the system keychain. The namespace maps to the keyring
/// "service" and the account to the keyring "user".
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringVault;

impl KeyringVault {
    pub fn new() -> Self {
        Self
    }

    fn entry(namespace: &str, account: &str) -> StoreResult<Entry> {
        Entry::new(namespace, account).map_err(|e| {
            StoreError::Backend(format!(
                "create keychain entry {}@{}: {}",
                account, namespace, e
            ))
        })
    }
}

impl SecretVault for KeyringVault {
    fn name(&self) -> &str {
        "keychain"
    }

    fn get(&self, namespace: &str, account: &str) -> StoreResult<Option<String>> {
        match Self::entry(namespace, account)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Backend(format!(
                "read {}@{}: {}",
                account, namespace, e
            ))),
        }
    }

    fn set(&self, namespace: &str, account: &str, secret: &str) -> StoreResult<()> {
        Self::entry(namespace, account)?
            .set_password(secret)
            .map_err(|e| {
                StoreError::Backend(format!("write {}@{}: {}", account, namespace, e))
            })
    }

    fn delete(&self, namespace: &str, account: &str) -> StoreResult<()> {
        match Self::entry(namespace, account)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Err(StoreError::not_found(namespace, account)),
            Err(e) => Err(StoreError::Backend(format!(
                "delete {}@{}: {}",
                account, namespace, e
            ))),
        }
    }
}
