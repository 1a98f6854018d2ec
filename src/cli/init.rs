use crate::cli::CliContext;
use crate::constants;
use crate::core::settings;
use crate::util::fs as pass_fs;
use anyhow::{bail, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Namespace prefix for keyring entries
    #[arg(long)]
    pub namespace: Option<String>,
}

pub fn run(ctx: &CliContext, args: InitArgs) -> Result<()> {
    let paths = &ctx.paths;
    let created = pass_fs::ensure_dir(&paths.root, constants::HOME_DIR_MODE)?;

    if ctx.settings_load_warning.is_some() {
        bail!(
            "refusing to overwrite unreadable {}; fix or remove it first",
            paths.config_toml.display()
        );
    }
    let mut config = ctx.settings.clone();
    if let Some(ns) = args.namespace {
        if ns.trim().is_empty() {
            bail!("namespace cannot be empty");
        }
        config.vault.namespace = ns;
    }
    settings::save(&paths.config_toml, &config)?;

    if created {
        println!("initialized {}", paths.root.display());
    } else {
        println!("updated {}", paths.config_toml.display());
    }
    println!("keyring namespace: {}", config.vault.namespace);
    Ok(())
}
