//! Metadata index model: which (service, login) pairs are registered.

use crate::constants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The per-principal index, persisted as one secret in the vault.
///
/// Login order within a service is significant: the first login is the
/// service's default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaIndex {
    #[serde(rename = "version", default = "default_version")]
    pub schema_version: String,
    #[serde(default)]
    pub services: BTreeMap<String, Vec<String>>,
}

impl Default for MetaIndex {
    fn default() -> Self {
        Self {
            schema_version: default_version(),
            services: BTreeMap::new(),
        }
    }
}

impl MetaIndex {
    pub fn logins(&self, service: &str) -> &[String] {
        self.services
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All registered (service, login) pairs in listing order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.services
            .iter()
            .flat_map(|(service, logins)| {
                logins
                    .iter()
                    .map(move |login| (service.clone(), login.clone()))
            })
            .collect()
    }
}

pub(crate) fn default_version() -> String {
    constants::INDEX_SCHEMA_VERSION.to_string()
}
