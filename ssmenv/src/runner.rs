use std::io::Write;

use anyhow::{Context, anyhow};
use app::{
    ExportRequest, export_lines,
    configs::{Configs, SsmStorageConfig},
    environment::EnvironmentSnapshot,
    storage::{factory::ParameterStoreFactory, repository::ParameterStore},
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Logs go to stderr; stdout carries only the shell lines.
fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter) // reads RUST_LOG
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

pub fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Runs the export against an already constructed store and writes the
/// result to `out`. Nothing is written when any step fails.
pub async fn execute<S, W>(
    store: &S,
    request: &ExportRequest,
    snapshot: &EnvironmentSnapshot,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: ParameterStore + ?Sized,
    W: Write,
{
    let lines = export_lines(store, request, snapshot).await?;
    debug!(count = lines.len(), "Writing output lines");
    write_lines(out, &lines).context("Failed to write output")?;
    Ok(())
}

pub async fn start(args: Args, snapshot: EnvironmentSnapshot) -> anyhow::Result<()> {
    setup_logging();

    let request = args.export_request();
    if request.filters.build()?.is_empty() {
        warn!("Nothing selected. Use --names, --paths or --tags");
        return Ok(());
    }

    let base_config = SsmStorageConfig::load().map_err(|e| anyhow!(e.to_string()))?;
    let store = ParameterStoreFactory::new(args.storage_config(base_config))
        .create()
        .await?;
    info!("Parameter store client ready");

    let stdout = std::io::stdout();
    execute(store.as_ref(), &request, &snapshot, &mut stdout.lock()).await
}
