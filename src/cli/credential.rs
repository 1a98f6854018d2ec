use crate::cli::CliContext;
use crate::constants;
use anyhow::{bail, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use dialoguer::Password;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::Serialize;
use std::io::Read;
use zeroize::Zeroizing;

fn parse_service_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("service name cannot be empty".into());
    }
    if s == constants::META_SUFFIX {
        return Err(format!("'{}' is reserved for the metadata index", s));
    }
    Ok(s.to_string())
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Service name
    #[arg(value_parser = parse_service_name)]
    pub service: String,

    /// Login to store (default: current user)
    #[arg(short = 'u', long)]
    pub login: Option<String>,

    /// Password to store (default: prompt with confirmation)
    #[arg(short = 'p', long, conflicts_with_all = ["from_stdin", "generate"])]
    pub password: Option<String>,

    /// Read password from stdin instead of interactive prompt
    #[arg(long, conflicts_with = "generate")]
    pub from_stdin: bool,

    /// Generate a random password
    #[arg(long)]
    pub generate: bool,

    /// Length for generated password
    #[arg(long, default_value_t = constants::DEFAULT_GENERATED_LENGTH)]
    pub length: usize,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Service name
    #[arg(value_parser = parse_service_name)]
    pub service: String,

    /// Login to show (default: the service's first login)
    #[arg(short = 'u', long)]
    pub login: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Service name
    #[arg(value_parser = parse_service_name)]
    pub service: String,

    /// Login to remove (default: current user)
    #[arg(short = 'u', long)]
    pub login: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Serialize)]
struct ListItem {
    service: String,
    default_login: Option<String>,
    logins: Vec<String>,
}

pub fn run_list(ctx: &CliContext, args: ListArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }

    let mut store = ctx.open_store();
    let items: Vec<ListItem> = store
        .list_services()?
        .map(|(service, logins)| ListItem {
            service: service.to_string(),
            default_login: logins.first().cloned(),
            logins: logins.to_vec(),
        })
        .collect();

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&items).context("serialize list")?;
        println!("{}", json);
        return Ok(());
    }

    if items.is_empty() {
        println!("No service logins found");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Service").add_attribute(Attribute::Bold),
        Cell::new("Default").add_attribute(Attribute::Bold),
        Cell::new("Logins").add_attribute(Attribute::Bold),
    ]);
    for item in items {
        let logins = if item.logins.is_empty() {
            "-".to_string()
        } else {
            item.logins.join(", ")
        };
        table.add_row(vec![
            item.service,
            item.default_login.unwrap_or_else(|| "-".to_string()),
            logins,
        ]);
    }

    println!("{}", table);
    Ok(())
}

pub fn run_add(ctx: &CliContext, args: AddArgs) -> Result<()> {
    if args.generate {
        if let Err(msg) = ctx.settings.policy.check_generated_length(args.length) {
            bail!(msg);
        }
        if args.length == 0 {
            bail!("--length must be greater than zero");
        }
    }

    let _index_lock = ctx.lock_index()?;
    let mut store = ctx.open_store();
    let login = store.login_or_user(args.login.as_deref());

    let password: Zeroizing<String> = if let Some(p) = args.password {
        Zeroizing::new(p)
    } else if args.generate {
        Zeroizing::new(generate_password(args.length))
    } else if args.from_stdin {
        read_password_stdin()?
    } else if ctx.non_interactive {
        bail!("--non-interactive requires --password, --from-stdin or --generate for add");
    } else {
        prompt_password(&args.service, &login)?
    };
    check_size(&password)?;

    let stored = Zeroizing::new(store.set(&args.service, Some(login.as_str()), &password)?);
    ctx.audit("add", &args.service, Some(&login));

    if args.generate {
        println!("Generated password for {}@{}: {}", login, args.service, stored.as_str());
    }
    println!("Service login added");
    Ok(())
}

pub fn run_show(ctx: &CliContext, args: ShowArgs) -> Result<()> {
    let mut store = ctx.open_store();
    let (login, password) = store.resolve(&args.service, args.login.as_deref())?;
    let password = password.map(Zeroizing::new);
    ctx.audit("show", &args.service, Some(&login));

    match password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => println!("Password for {}@{} is {}", login, args.service, p),
        None => println!("Password for {}@{} is empty or not set", login, args.service),
    }
    Ok(())
}

pub fn run_delete(ctx: &CliContext, args: DeleteArgs) -> Result<()> {
    let _index_lock = ctx.lock_index()?;
    let mut store = ctx.open_store();
    let login = store
        .delete(&args.service, args.login.as_deref())
        .with_context(|| format!("delete login for service '{}'", args.service))?;
    ctx.audit("delete", &args.service, Some(&login));

    println!("Service login removed");
    Ok(())
}

/// Double-entry prompt; a mismatch re-prompts until both entries agree.
fn prompt_password(service: &str, login: &str) -> Result<Zeroizing<String>> {
    let password = Password::new()
        .with_prompt(format!("Enter password for user {}@{}", login, service))
        .with_confirmation("Repeat for confirmation", "Passwords do not match")
        .interact()
        .context("read password from prompt")?;
    Ok(Zeroizing::new(password))
}

fn read_password_stdin() -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("read password from stdin")?;
    Ok(Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string()))
}

fn check_size(password: &str) -> Result<()> {
    if password.len() > constants::MAX_SECRET_SIZE {
        bail!(
            "password exceeds maximum size ({} bytes, max {} bytes)",
            password.len(),
            constants::MAX_SECRET_SIZE
        );
    }
    Ok(())
}

fn generate_password(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_name() {
        assert!(parse_service_name("github").is_ok());
        assert!(parse_service_name("mail.example.com").is_ok());
        assert!(parse_service_name("").is_err());
        assert!(parse_service_name("  ").is_err());
        assert!(parse_service_name("meta").is_err());
    }

    #[test]
    fn test_generate_password() {
        assert_eq!(generate_password(24).len(), 24);
        assert!(generate_password(100)
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_check_size() {
        assert!(check_size("short").is_ok());
        assert!(check_size(&"x".repeat(constants::MAX_SECRET_SIZE + 1)).is_err());
    }
}
