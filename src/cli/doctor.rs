//! Read-only diagnostics for configuration and keyring access.

use crate::cli::CliContext;
use crate::constants;
use crate::core::{audit_log, metadata};
use crate::core::vault::SecretVault;
use crate::util::fs as pass_fs;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Skip the keyring round trip (useful on headless machines)
    #[arg(long)]
    pub offline: bool,
}

#[derive(Default)]
struct Tally {
    ok: u32,
    warn: u32,
    fail: u32,
}

impl Tally {
    fn pass(&mut self, msg: impl AsRef<str>) {
        println!("  [PASS] {}", msg.as_ref());
        self.ok += 1;
    }

    fn warn(&mut self, msg: impl AsRef<str>) {
        println!("  [WARN] {}", msg.as_ref());
        self.warn += 1;
    }

    fn fail(&mut self, msg: impl AsRef<str>) {
        println!("  [FAIL] {}", msg.as_ref());
        self.fail += 1;
    }
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let paths = &ctx.paths;
    let mut t = Tally::default();

    println!("Doctor: {} (user {})", paths, ctx.user);

    if paths.root.is_dir() {
        t.pass(format!("home exists: {}", paths.root.display()));
        match pass_fs::mode_of(&paths.root) {
            Some(mode) if mode != constants::HOME_DIR_MODE => t.warn(format!(
                "home mode: {:04o} (expected {:04o})",
                mode,
                constants::HOME_DIR_MODE
            )),
            _ => {}
        }
    } else {
        t.warn(format!("home missing: {} (run: pass init)", paths.root.display()));
    }

    match &ctx.settings_load_warning {
        Some(w) => t.fail(w),
        None if paths.config_toml.exists() => t.pass("config.toml parsed"),
        None => t.warn("config.toml missing, using defaults"),
    }
    if !ctx.settings.policy.lock_index {
        t.warn("policy.lock_index = false: concurrent invocations may lose index updates");
    }

    if args.offline {
        println!("  [SKIP] keyring checks (--offline)");
    } else {
        let store = ctx.open_store();
        let vault = store.vault();
        let namespace = metadata::meta_namespace(store.app());
        match vault.get(&namespace, store.user()) {
            Ok(raw) => {
                t.pass(format!("{} reachable", vault.name()));
                match raw.as_deref().map(metadata::parse) {
                    None => t.warn("no metadata index stored yet"),
                    Some(Ok(index)) => t.pass(format!(
                        "metadata index v{} with {} service(s)",
                        index.schema_version,
                        index.services.len()
                    )),
                    Some(Err(e)) => t.fail(e.to_string()),
                }
            }
            Err(e) => t.fail(format!("{} unreachable: {}", vault.name(), e)),
        }
    }

    match audit_log::verify_chain(paths) {
        Ok((0, _)) => t.warn("audit log empty"),
        Ok((total, errors)) if errors.is_empty() => {
            t.pass(format!("audit chain intact ({} entries)", total))
        }
        Ok((_, errors)) => t.fail(format!("audit chain has {} error(s)", errors.len())),
        Err(e) => t.fail(format!("audit log unreadable: {}", e)),
    }

    println!();
    println!("Doctor summary: {} pass, {} warn, {} fail", t.ok, t.warn, t.fail);
    if t.fail > 0 {
        std::process::exit(1);
    }
    Ok(())
}
