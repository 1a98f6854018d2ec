//! Filesystem helpers for the private home directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Create `path` if missing and force its mode. Returns true if it was created.
pub fn ensure_dir(path: &Path, mode: u32) -> Result<bool> {
    let created = !path.exists();
    if created {
        fs::create_dir_all(path)
            .with_context(|| format!("create directory {}", path.display()))?;
    }
    set_permissions(path, mode)?;
    Ok(created)
}

pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(mode);
        fs::set_permissions(path, perm)
            .with_context(|| format!("set permissions {:o} on {}", mode, path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
}

/// Permission bits of `path`, if it exists and the platform has them.
pub fn mode_of(path: &Path) -> Option<u32> {
    #[cfg(unix)]
    {
        fs::metadata(path).ok().map(|m| m.permissions().mode() & 0o777)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_sets_mode() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("a").join("b");
        assert!(ensure_dir(&home, 0o700).unwrap());
        assert!(home.is_dir());
        assert_eq!(mode_of(&home), Some(0o700));

        set_permissions(&home, 0o755).unwrap();
        assert!(!ensure_dir(&home, 0o700).unwrap());
        assert_eq!(mode_of(&home), Some(0o700));
    }

    #[test]
    fn test_mode_of_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(mode_of(&dir.path().join("nope")), None);
    }
}
