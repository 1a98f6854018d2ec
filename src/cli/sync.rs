use crate::cli::CliContext;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Report stale index entries without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(ctx: &CliContext, args: SyncArgs) -> Result<()> {
    let _index_lock = if args.dry_run {
        None
    } else {
        ctx.lock_index()?
    };
    let mut store = ctx.open_store();
    let report = store.resync(args.dry_run)?;

    for (service, login) in &report.stale {
        let verb = if args.dry_run { "would remove" } else { "removed" };
        println!("  {} {}@{} (no secret in keyring)", verb, login, service);
    }
    if report.saved {
        ctx.audit("sync", "*", None);
    }

    println!(
        "Checked {} service login(s), {} stale",
        report.checked,
        report.stale.len()
    );
    Ok(())
}
