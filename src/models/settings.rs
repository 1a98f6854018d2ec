//! `config.toml` model.

use crate::constants;
use crate::models::policy::PolicySection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub vault: VaultSection,
    #[serde(default)]
    pub policy: PolicySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSection {
    /// Application prefix: secrets live under `{namespace}.{service}`.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for VaultSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> String {
    constants::DEFAULT_NAMESPACE.to_string()
}
