//! Credential store: keeps vault secrets and the metadata index in step.
//!
//! Every secret mutation is mirrored in the index and the index is written
//! back right after. The two writes are not atomic; a crash in between
//! leaves them diverged until `resync` is run.
//!
//! No locking happens here. Two processes working against the same
//! principal's vault race on load/modify/save and the last writer wins;
//! the CLI serializes mutating commands with a file lock when configured to.

use crate::constants;
use crate::core::error::{StoreError, StoreResult};
use crate::core::metadata;
use crate::core::vault::SecretVault;
use crate::models::index::MetaIndex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `service -> {login: password}`; absent passwords export as `null`.
pub type ExportMap = BTreeMap<String, Map<String, Value>>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<(String, String)>,
    /// Pairs whose password was `null` in the source.
    pub skipped: Vec<(String, String)>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub checked: usize,
    /// Indexed pairs with no secret in the vault.
    pub stale: Vec<(String, String)>,
    pub saved: bool,
}

pub struct CredentialStore<V: SecretVault> {
    vault: V,
    app: String,
    user: String,
    index: Option<MetaIndex>,
}

impl<V: SecretVault> CredentialStore<V> {
    /// Create a store over `vault` for the local principal `user`.
    /// The index is read on first use and cached for the store's lifetime.
    pub fn new(vault: V, app: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            vault,
            app: app.into(),
            user: user.into(),
            index: None,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Namespace holding the secrets of `service`.
    pub fn namespace_for(&self, service: &str) -> String {
        metadata::service_namespace(&self.app, service)
    }

    fn index_mut(&mut self) -> StoreResult<&mut MetaIndex> {
        let index = match self.index.take() {
            Some(index) => index,
            None => metadata::load(&self.vault, &self.app, &self.user)?,
        };
        Ok(self.index.insert(index))
    }

    /// The cached index, loading it if needed.
    pub fn index(&mut self) -> StoreResult<&MetaIndex> {
        self.index_mut().map(|index| &*index)
    }

    fn save(&mut self) -> StoreResult<()> {
        let Some(index) = self.index.as_ref() else {
            return Ok(());
        };
        metadata::save(&self.vault, &self.app, &self.user, index)
    }

    fn validate_service(&self, service: &str) -> StoreResult<()> {
        if service.is_empty() {
            return Err(StoreError::InvalidName("service name cannot be empty".into()));
        }
        if service == constants::META_SUFFIX {
            return Err(StoreError::InvalidName(format!(
                "service name '{}' is reserved for the metadata index",
                service
            )));
        }
        Ok(())
    }

    /// Login used for writes when none is given: the local principal.
    pub fn login_or_user(&self, login: Option<&str>) -> String {
        match login {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => self.user.clone(),
        }
    }

    pub fn default_login(&mut self, service: &str) -> StoreResult<String> {
        let user = self.user.clone();
        let index = self.index_mut()?;
        Ok(metadata::default_login(index, service, &user))
    }

    /// Resolve a login (defaulting via the index) and its password.
    /// A missing secret is `None`, not an error.
    pub fn resolve(
        &mut self,
        service: &str,
        login: Option<&str>,
    ) -> StoreResult<(String, Option<String>)> {
        self.validate_service(service)?;
        let login = match login {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => self.default_login(service)?,
        };
        let password = self.vault.get(&self.namespace_for(service), &login)?;
        Ok((login, password))
    }

    /// Store a password and register the pair. Returns the stored password.
    pub fn set(
        &mut self,
        service: &str,
        login: Option<&str>,
        password: &str,
    ) -> StoreResult<String> {
        self.validate_service(service)?;
        let login = self.login_or_user(login);
        self.vault
            .set(&self.namespace_for(service), &login, password)?;
        metadata::add_login(self.index_mut()?, service, &login);
        self.save()?;
        Ok(password.to_string())
    }

    /// Delete a secret and unregister the pair. Fails with `NotFound` if
    /// the vault has no such secret; the index is left untouched then.
    pub fn delete(&mut self, service: &str, login: Option<&str>) -> StoreResult<String> {
        self.validate_service(service)?;
        let login = self.login_or_user(login);
        self.vault.delete(&self.namespace_for(service), &login)?;
        metadata::remove_login(self.index_mut()?, service, &login);
        self.save()?;
        Ok(login)
    }

    /// Snapshot of `(service, logins)` from the index. Does not touch the
    /// vault beyond the initial index load.
    pub fn list_services(
        &mut self,
    ) -> StoreResult<impl Iterator<Item = (&str, &[String])> + Clone + '_> {
        let index = self.index()?;
        Ok(index
            .services
            .iter()
            .map(|(service, logins)| (service.as_str(), logins.as_slice())))
    }

    /// Resolve every indexed pair's password.
    pub fn export_all(&mut self) -> StoreResult<ExportMap> {
        let index = self.index()?.clone();
        if index.services.is_empty() {
            return Err(StoreError::EmptyInput(
                "No service logins found, export cancelled".into(),
            ));
        }

        let mut out = ExportMap::new();
        for (service, logins) in &index.services {
            let namespace = self.namespace_for(service);
            let mut entries = Map::new();
            for login in logins {
                let password = self.vault.get(&namespace, login)?;
                entries.insert(
                    login.clone(),
                    password.map(Value::String).unwrap_or(Value::Null),
                );
            }
            out.insert(service.clone(), entries);
        }
        Ok(out)
    }

    /// Apply `set` for every `{service: {login: password}}` entry in `data`,
    /// in document order.
    pub fn import_all(&mut self, data: &str) -> StoreResult<ImportReport> {
        let empty = || StoreError::EmptyInput("File seems empty, import cancelled".into());
        if data.trim().is_empty() {
            return Err(empty());
        }
        let value: Value = serde_json::from_str(data).map_err(|_| empty())?;
        let Value::Object(services) = value else {
            return Err(empty());
        };
        if services.is_empty() {
            return Err(empty());
        }

        // Validate the whole document before writing anything.
        let mut plan: Vec<(String, String, Option<String>)> = Vec::new();
        for (service, logins) in services {
            self.validate_service(&service)?;
            let Value::Object(logins) = logins else {
                return Err(StoreError::EmptyInput(format!(
                    "Entry for service '{}' is not a login map, import cancelled",
                    service
                )));
            };
            for (login, password) in logins {
                if login.is_empty() {
                    return Err(StoreError::InvalidName(format!(
                        "empty login for service '{}'",
                        service
                    )));
                }
                let password = match password {
                    Value::String(p) => Some(p),
                    Value::Null => None,
                    _ => {
                        return Err(StoreError::EmptyInput(format!(
                            "Password for {}@{} is not a string, import cancelled",
                            login, service
                        )))
                    }
                };
                plan.push((service.clone(), login, password));
            }
        }

        let mut report = ImportReport::default();
        for (service, login, password) in plan {
            match password {
                Some(p) => {
                    self.set(&service, Some(&login), &p)?;
                    report.imported.push((service, login));
                }
                None => report.skipped.push((service, login)),
            }
        }
        Ok(report)
    }

    /// Prune indexed pairs whose secret no longer exists in the vault.
    /// The vault cannot be enumerated, so secrets missing from the index
    /// are not discovered.
    pub fn resync(&mut self, dry_run: bool) -> StoreResult<SyncReport> {
        let pairs = self.index()?.pairs();
        let mut report = SyncReport {
            checked: pairs.len(),
            ..Default::default()
        };
        for (service, login) in pairs {
            if self.vault.get(&self.namespace_for(&service), &login)?.is_none() {
                report.stale.push((service, login));
            }
        }
        if dry_run || report.stale.is_empty() {
            return Ok(report);
        }

        let index = self.index_mut()?;
        for (service, login) in &report.stale {
            metadata::remove_login(index, service, login);
        }
        self.save()?;
        report.saved = true;
        Ok(report)
    }
}
