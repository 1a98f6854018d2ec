//! Metadata index persistence and bookkeeping.
//!
//! The index is stored as a single JSON secret under `{app}.meta`, keyed by
//! the local principal. Bookkeeping here is forgiving: adding a known pair
//! or removing an unknown one is a no-op.

use crate::constants;
use crate::core::error::{StoreError, StoreResult};
use crate::core::vault::SecretVault;
use crate::models::index::{default_version, MetaIndex};
use serde_json::Value;
use std::collections::BTreeMap;

/// Namespace of the metadata record.
pub fn meta_namespace(app: &str) -> String {
    format!("{}.{}", app, constants::META_SUFFIX)
}

/// Namespace of the secrets for one service.
pub fn service_namespace(app: &str, service: &str) -> String {
    format!("{}.{}", app, service)
}

/// Load the index for `user`, or an empty one if none was saved yet.
pub fn load<V: SecretVault + ?Sized>(vault: &V, app: &str, user: &str) -> StoreResult<MetaIndex> {
    match vault.get(&meta_namespace(app), user)? {
        Some(raw) => parse(&raw),
        None => Ok(MetaIndex::default()),
    }
}

/// Serialize the whole index and write it back. There is no partial write.
pub fn save<V: SecretVault + ?Sized>(
    vault: &V,
    app: &str,
    user: &str,
    index: &MetaIndex,
) -> StoreResult<()> {
    let raw = serde_json::to_string(index)?;
    vault.set(&meta_namespace(app), user, &raw)
}

/// Parse a stored index, backfilling a missing `version` or `services`.
pub fn parse(raw: &str) -> StoreResult<MetaIndex> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| StoreError::Corruption(format!("unparseable meta record: {}", e)))?;
    let Value::Object(mut obj) = value else {
        return Err(StoreError::Corruption(
            "meta record is not a JSON object".into(),
        ));
    };

    let schema_version = match obj.remove("version") {
        Some(Value::String(v)) => v,
        _ => default_version(),
    };

    let mut services = BTreeMap::new();
    if let Some(Value::Object(entries)) = obj.remove("services") {
        for (service, logins) in entries {
            let Value::Array(items) = logins else {
                return Err(StoreError::Corruption(format!(
                    "logins for service '{}' are not a list",
                    service
                )));
            };
            let mut seq: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                let Value::String(login) = item else {
                    return Err(StoreError::Corruption(format!(
                        "non-string login for service '{}'",
                        service
                    )));
                };
                if !seq.contains(&login) {
                    seq.push(login);
                }
            }
            services.insert(service, seq);
        }
    }

    Ok(MetaIndex {
        schema_version,
        services,
    })
}

/// The login used when none is given: the first registered login, or the
/// local principal if the service has none.
pub fn default_login(index: &MetaIndex, service: &str, user: &str) -> String {
    index
        .logins(service)
        .first()
        .cloned()
        .unwrap_or_else(|| user.to_string())
}

/// Append `login` to the service's logins unless already present.
/// Returns whether the index changed.
pub fn add_login(index: &mut MetaIndex, service: &str, login: &str) -> bool {
    let logins = index.services.entry(service.to_string()).or_default();
    if logins.iter().any(|l| l == login) {
        return false;
    }
    logins.push(login.to_string());
    true
}

/// Remove `login` from the service's logins. Unknown pairs are ignored and
/// the service key is kept even when its list becomes empty.
pub fn remove_login(index: &mut MetaIndex, service: &str, login: &str) -> bool {
    match index.services.get_mut(service) {
        Some(logins) => {
            let before = logins.len();
            logins.retain(|l| l != login);
            logins.len() != before
        }
        None => false,
    }
}
