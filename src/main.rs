use anyhow::Result;
use clap::Parser;
use mipcheck::{aggregate, cli::Args, report, tables};
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!(dir = %args.tables_dir.display(), "checking tables");

    // ─── 2) load + validate tables ───────────────────────────────────
    let tables = tables::load_tables(&args.tables_dir)?;
    println!("Loaded and validated {} tables", tables.len());

    // ─── 3) validate entries + aggregate per variable ────────────────
    let variables = aggregate::aggregate_variables(&tables)?;
    info!(
        tables = tables.len(),
        variables = variables.len(),
        "aggregation complete"
    );

    // ─── 4) run the selected reporters ───────────────────────────────
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.check_units {
        report::check_units(&variables, &mut out)?;
    }
    if args.check_dimensions {
        report::check_dimensions(&variables, &mut out)?;
    }
    if args.multitable {
        report::check_multitable(&variables, &mut out)?;
    }
    if args.report_statistics {
        report::report_statistics(&tables, &variables, &mut out)?;
    }
    // --duplicates is accepted but has no reporter wired up yet.

    Ok(())
}
