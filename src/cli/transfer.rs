//! Export to and import from plain JSON files.
//!
//! Format: `{ service: { login: password, ... }, ... }`.

use crate::cli::CliContext;
use crate::constants;
use crate::core::error::StoreError;
use crate::core::settings;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use zeroize::Zeroizing;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file ("-" for stdout)
    #[arg(value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Input file ("-" for stdin)
    #[arg(value_name = "PATH")]
    pub input: PathBuf,
}

fn is_stdio(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}

/// Pretty JSON with 4-space indentation; non-ASCII is kept verbatim.
pub fn to_export_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(constants::EXPORT_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).context("serialize export")?;
    String::from_utf8(buf).context("export is not valid UTF-8")
}

/// Print a non-fatal condition and let the process succeed.
fn report_user_visible(err: StoreError) -> Result<()> {
    if err.is_user_visible() {
        eprintln!("ERROR: {}", err);
        return Ok(());
    }
    Err(err.into())
}

pub fn run_export(ctx: &CliContext, args: ExportArgs) -> Result<()> {
    let mut store = ctx.open_store();
    let data = match store.export_all() {
        Ok(data) => data,
        Err(e) => return report_user_visible(e),
    };
    let json = Zeroizing::new(to_export_json(&data)?);

    if is_stdio(&args.output) {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", json.as_str()).context("write to stdout")?;
        stdout.flush().context("flush stdout")?;
    } else {
        settings::write_private(&args.output, json.as_bytes(), constants::EXPORT_FILE_MODE)
            .with_context(|| format!("write export {}", args.output.display()))?;
        eprintln!(
            "Exported {} service(s) to {}",
            data.len(),
            args.output.display()
        );
    }
    ctx.audit("export", "*", None);
    Ok(())
}

pub fn run_import(ctx: &CliContext, args: ImportArgs) -> Result<()> {
    let text = if is_stdio(&args.input) {
        let mut buf = Zeroizing::new(String::new());
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read import from stdin")?;
        buf
    } else {
        Zeroizing::new(
            fs::read_to_string(&args.input)
                .with_context(|| format!("read import {}", args.input.display()))?,
        )
    };

    let _index_lock = ctx.lock_index()?;
    let mut store = ctx.open_store();
    let report = match store.import_all(&text) {
        Ok(report) => report,
        Err(e) => return report_user_visible(e),
    };

    for (service, login) in &report.imported {
        ctx.audit("import", service, Some(login));
    }
    for (service, login) in &report.skipped {
        eprintln!("warning: no password for {}@{}, skipped", login, service);
    }
    println!("Imported {} service login(s)", report.imported.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_json_uses_four_spaces() {
        let json = to_export_json(&json!({"github": {"alice": "x"}})).unwrap();
        assert_eq!(
            json,
            "{\n    \"github\": {\n        \"alice\": \"x\"\n    }\n}"
        );
    }

    #[test]
    fn test_export_json_keeps_non_ascii() {
        let json = to_export_json(&json!({"почта": {"me": "пароль"}})).unwrap();
        assert!(json.contains("почта"));
        assert!(json.contains("пароль"));
    }

    #[test]
    fn test_stdio_marker() {
        assert!(is_stdio(std::path::Path::new("-")));
        assert!(!is_stdio(std::path::Path::new("out.json")));
    }

    #[test]
    fn test_empty_input_is_not_fatal() {
        assert!(report_user_visible(StoreError::EmptyInput("nothing".into())).is_ok());
        assert!(report_user_visible(StoreError::Corruption("bad".into())).is_err());
    }
}
