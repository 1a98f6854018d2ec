//! Append-only, hash-chained audit trail. Entries never contain secrets.

use crate::constants;
use crate::core::file_lock::FileLock;
use crate::core::paths::PassPaths;
use crate::util::fs as pass_fs;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub actor: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_hash: Option<String>,
}

impl AuditEntry {
    /// SHA-256 over the entry serialized without its own hash.
    fn compute_hash(&self) -> Result<String> {
        let mut unhashed = self.clone();
        unhashed.entry_hash = None;
        let json = serde_json::to_string(&unhashed).context("serialize for hash")?;
        Ok(format!("{:064x}", Sha256::digest(json.as_bytes())))
    }
}

/// Append one entry, chaining it to the previous one.
pub fn log(
    paths: &PassPaths,
    actor: &str,
    action: &str,
    service: &str,
    login: Option<&str>,
) -> Result<()> {
    pass_fs::ensure_dir(&paths.root, constants::HOME_DIR_MODE)?;
    let _lock = FileLock::exclusive(&paths.audit_lock)?;
    let prev_hash = read_entries(&paths.audit_log)?
        .last()
        .and_then(|e| e.entry_hash.clone());

    let mut entry = AuditEntry {
        timestamp: Utc::now(),
        action: action.to_string(),
        actor: actor.to_string(),
        service: service.to_string(),
        login: login.map(str::to_string),
        prev_hash,
        entry_hash: None,
    };
    entry.entry_hash = Some(entry.compute_hash()?);

    let line = serde_json::to_string(&entry).context("serialize audit entry")?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.audit_log)
        .with_context(|| format!("open audit log {}", paths.audit_log.display()))?;
    writeln!(file, "{}", line).context("write audit entry")?;
    pass_fs::set_permissions(&paths.audit_log, constants::AUDIT_LOG_MODE)
}

fn read_entries(path: &Path) -> Result<Vec<AuditEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = fs::File::open(path).with_context(|| format!("open audit log {}", path.display()))?;
    let mut entries = Vec::new();
    let mut malformed = 0usize;
    for line in BufReader::new(file).lines() {
        let line = line.context("read audit log line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<AuditEntry>(trimmed) {
            Ok(entry) => entries.push(entry),
            Err(_) => malformed += 1,
        }
    }
    if malformed > 0 {
        eprintln!("warning: {} malformed audit entries skipped", malformed);
    }
    Ok(entries)
}

/// Read the most recent `limit` entries (all when `None`).
pub fn read_log(paths: &PassPaths, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
    let mut entries = read_entries(&paths.audit_log)?;
    if let Some(limit) = limit {
        if entries.len() > limit {
            entries = entries.split_off(entries.len() - limit);
        }
    }
    Ok(entries)
}

/// Check hashes and chaining. Returns (total, errors).
pub fn verify_chain(paths: &PassPaths) -> Result<(usize, Vec<String>)> {
    let entries = read_entries(&paths.audit_log)?;
    let mut errors = Vec::new();
    let mut prev: Option<&String> = None;

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 && entry.prev_hash.as_ref() != prev {
            errors.push(format!("entry {}: prev_hash does not match previous entry", i + 1));
        }
        match &entry.entry_hash {
            Some(stored) => {
                if &entry.compute_hash()? != stored {
                    errors.push(format!("entry {}: entry_hash mismatch (tampered?)", i + 1));
                }
            }
            None => errors.push(format!("entry {}: missing entry_hash", i + 1)),
        }
        prev = entry.entry_hash.as_ref();
    }

    Ok((entries.len(), errors))
}
