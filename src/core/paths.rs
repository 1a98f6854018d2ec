//! Home directory resolution and layout.

use crate::constants;
use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PassPaths {
    pub root: PathBuf,
    pub config_toml: PathBuf,
    pub audit_log: PathBuf,
    pub audit_lock: PathBuf,
    pub index_lock: PathBuf,
}

impl PassPaths {
    /// Resolve the home directory from CLI arg, env var, or the platform data dir.
    pub fn resolve(root_arg: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = root_arg {
            return Ok(Self::from_root(root));
        }
        if let Ok(root) = env::var(constants::HOME_ENV) {
            if !root.is_empty() {
                return Ok(Self::from_root(PathBuf::from(root)));
            }
        }
        match dirs::data_local_dir() {
            Some(dir) => Ok(Self::from_root(dir.join(constants::HOME_DIR_NAME))),
            None => bail!(
                "cannot determine a data directory; pass --root or set {}",
                constants::HOME_ENV
            ),
        }
    }

    pub fn from_root(root: PathBuf) -> Self {
        let config_toml = root.join("config.toml");
        let audit_log = root.join("audit.log");
        let audit_lock = root.join("audit.lock");
        let index_lock = root.join("index.lock");
        Self {
            root,
            config_toml,
            audit_log,
            audit_lock,
            index_lock,
        }
    }
}

impl std::fmt::Display for PassPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pass@{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_root() {
        let paths = PassPaths::from_root(PathBuf::from("/test"));
        assert_eq!(paths.root, PathBuf::from("/test"));
        assert_eq!(paths.config_toml, PathBuf::from("/test/config.toml"));
        assert_eq!(paths.audit_log, PathBuf::from("/test/audit.log"));
        assert_eq!(paths.audit_lock, PathBuf::from("/test/audit.lock"));
        assert_eq!(paths.index_lock, PathBuf::from("/test/index.lock"));
    }

    #[test]
    fn test_explicit_root_wins() {
        let paths = PassPaths::resolve(Some(PathBuf::from("/explicit"))).unwrap();
        assert_eq!(paths.root, PathBuf::from("/explicit"));
        assert_eq!(paths.to_string(), "pass@/explicit");
    }
}
