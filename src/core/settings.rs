use crate::constants;
use crate::models::settings::SettingsFile;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn load(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let mut settings: SettingsFile = toml::from_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;
    if settings.vault.namespace.trim().is_empty() {
        settings.vault.namespace = constants::DEFAULT_NAMESPACE.to_string();
    }
    Ok(settings)
}

pub fn save(path: &Path, settings: &SettingsFile) -> Result<()> {
    let content = toml::to_string_pretty(settings).context("serialize config")?;
    write_private(path, content.as_bytes(), constants::CONFIG_FILE_MODE)
        .with_context(|| format!("write config {}", path.display()))
}

/// Atomically replace `path` with `data`, restricting permissions first.
pub fn write_private(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent).context("create temp file")?;

    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(mode);
        tmp.as_file()
            .set_permissions(perm)
            .context("set permissions on temp file")?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.write_all(data).context("write temp file")?;
    tmp.flush().context("flush temp file")?;
    tmp.persist(path)
        .map_err(|err| anyhow::anyhow!("persist {}: {}", path.display(), err))?;
    Ok(())
}
