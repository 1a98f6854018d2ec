//! CLI routing and command dispatch.

use crate::core::file_lock::FileLock;
use crate::core::keyring_vault::KeyringVault;
use crate::core::paths::PassPaths;
use crate::core::settings;
use crate::core::store::CredentialStore;
use crate::models::settings::SettingsFile;
use crate::util::identity;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod audit;
pub mod credential;
pub mod doctor;
pub mod init;
pub mod sync;
pub mod transfer;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: PassPaths,
    pub non_interactive: bool,
    pub settings: SettingsFile,
    pub settings_load_warning: Option<String>,
    pub user: String,
}

impl CliContext {
    /// Append an audit entry if enabled. Failures only warn.
    pub fn audit(&self, action: &str, service: &str, login: Option<&str>) {
        if !self.settings.policy.audit {
            return;
        }
        if let Err(e) = crate::core::audit_log::log(&self.paths, &self.user, action, service, login) {
            eprintln!("warning: audit log failed: {}", e);
        }
    }

    /// Store over the OS keychain for the local principal.
    pub fn open_store(&self) -> CredentialStore<KeyringVault> {
        CredentialStore::new(
            KeyringVault::new(),
            self.settings.vault.namespace.clone(),
            self.user.clone(),
        )
    }

    /// Serialize index read-modify-write across invocations, per policy.
    pub fn lock_index(&self) -> Result<Option<FileLock>> {
        FileLock::exclusive_if(self.settings.policy.lock_index, &self.paths.index_lock)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pass",
    version,
    about = "Keep service logins and passwords in the system keyring",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Home directory for config, audit log and locks
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "PASS_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let paths = PassPaths::resolve(self.root)?;

        // A broken config should not lock the user out of their passwords.
        let mut settings_load_warning: Option<String> = None;
        let settings = match settings::load(&paths.config_toml) {
            Ok(s) => s,
            Err(e) => {
                settings_load_warning = Some(format!("cannot read config.toml: {:#}", e));
                SettingsFile::default()
            }
        };
        if let Some(w) = &settings_load_warning {
            if !matches!(self.command, Commands::Doctor(_)) {
                eprintln!("warning: {} (using defaults)", w);
            }
        }

        let ctx = CliContext {
            paths,
            non_interactive: self.non_interactive,
            settings,
            settings_load_warning,
            user: identity::current_user(),
        };

        match self.command {
            Commands::List(args) => credential::run_list(&ctx, args),
            Commands::Add(args) => credential::run_add(&ctx, args),
            Commands::Show(args) => credential::run_show(&ctx, args),
            Commands::Delete(args) => credential::run_delete(&ctx, args),
            Commands::Export(args) => transfer::run_export(&ctx, args),
            Commands::Import(args) => transfer::run_import(&ctx, args),
            Commands::Sync(args) => sync::run(&ctx, args),
            Commands::Init(args) => init::run(&ctx, args),
            Commands::Doctor(args) => doctor::run(&ctx, args),
            Commands::Audit { command } => audit::run(&ctx, command),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List services and logins
    List(credential::ListArgs),
    /// Add or update a service login
    Add(credential::AddArgs),
    /// Show the password for a service login
    Show(credential::ShowArgs),
    /// Remove a service login
    Delete(credential::DeleteArgs),
    /// Export service logins to a JSON file
    Export(transfer::ExportArgs),
    /// Import service logins from a JSON file
    Import(transfer::ImportArgs),
    /// Resync metadata with the actual keyring contents
    Sync(sync::SyncArgs),
    /// Create the home directory and a default config.toml
    Init(init::InitArgs),
    /// Diagnose configuration and keyring access (read-only)
    Doctor(doctor::DoctorArgs),
    /// View the audit trail
    Audit {
        #[command(subcommand)]
        command: audit::AuditCommand,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_login_and_password() {
        let cli = Cli::try_parse_from(["pass", "add", "github", "-u", "alice", "-p", "x"]).unwrap();
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.service, "github");
                assert_eq!(args.login.as_deref(), Some("alice"));
                assert_eq!(args.password.as_deref(), Some("x"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_no_action_is_rejected() {
        assert!(Cli::try_parse_from(["pass"]).is_err());
    }

    #[test]
    fn test_password_sources_conflict() {
        assert!(Cli::try_parse_from(["pass", "add", "github", "-p", "x", "--generate"]).is_err());
        assert!(Cli::try_parse_from(["pass", "add", "github", "--from-stdin", "--generate"]).is_err());
    }
}
