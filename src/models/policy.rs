//! Policy configuration for credential operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySection {
    /// Minimum length for generated passwords.
    #[serde(default)]
    pub min_generated_length: Option<usize>,

    /// Append metadata-only entries to the audit log.
    #[serde(default = "default_true")]
    pub audit: bool,

    /// Hold an exclusive lock on the index for mutating commands.
    /// When false, concurrent invocations race and the last writer wins.
    #[serde(default = "default_true")]
    pub lock_index: bool,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            min_generated_length: None,
            audit: true,
            lock_index: true,
        }
    }
}

impl PolicySection {
    pub fn check_generated_length(&self, length: usize) -> Result<(), String> {
        match self.min_generated_length {
            Some(min) if length < min => Err(format!(
                "policy: generated password length {} below minimum {} (set in config.toml [policy])",
                length, min
            )),
            _ => Ok(()),
        }
    }
}

fn default_true() -> bool {
    true
}
