//! WITS Level 0 replay server
//!
//! Loads a recorded Volve well CSV, converts it to oilfield units and
//! streams it to every connected TCP client as WITS0 frames, paced at the
//! configured speed. Ctrl+C (or SIGTERM) stops the server.

use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wits_broadcaster::ReplayServer;
use wits_ingest::{first_well, list_wells, load_csv, IngestReport};
use wits_replay::{Cli, ReplayConfig};

const FEET_TO_METRES: f64 = 0.3048;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReplayConfig::load_from(path),
        None => ReplayConfig::load(),
    }
    .context("Failed to load configuration")?;
    config.apply_cli(&cli);
    config.validate().context("Invalid configuration")?;

    let wells_dir = config.wells_dir()?;

    if cli.list {
        return print_wells(&wells_dir, cli.json);
    }

    let file = match cli.file.clone() {
        Some(file) => file,
        None => first_well(&wells_dir)
            .with_context(|| format!("Failed to scan {}", wells_dir.display()))?
            .ok_or_else(|| anyhow!("No CSV files found in {}", wells_dir.display()))?,
    };

    if !file.is_file() {
        bail!("File not found: {}", file.display());
    }

    print_banner(&file, &config);

    let started = Instant::now();
    let load_path = file.clone();
    let report = tokio::task::spawn_blocking(move || load_csv(load_path))
        .await
        .context("CSV loader task failed")?
        .with_context(|| format!("Failed to load {}", file.display()))?;

    print_summary(&report, &config, started.elapsed().as_secs_f64());

    let server = ReplayServer::new(report.records, config.server_config())
        .context("Failed to create replay server")?;

    info!("Waiting for WITS clients (Ctrl+C to stop)");
    server
        .serve(shutdown_signal())
        .await
        .context("Replay server failed")?;

    Ok(())
}

fn print_banner(file: &Path, config: &ReplayConfig) {
    let well = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!("============================================================");
    info!("  Volve WITS Level 0 Replay Server v{}", env!("CARGO_PKG_VERSION"));
    info!("============================================================");
    info!("  Well:  {}", well);
    info!("  File:  {}", file.display());
    info!("  Bind:  {}:{}", config.bind_address, config.port);
    info!(
        "  Speed: {}x ({:.3}s per record)",
        config.speed,
        config.seconds_per_record()
    );
    info!("  Loop:  {}", config.loop_replay);
    if !config.config_path.as_os_str().is_empty() {
        info!("  Config: {}", config.config_path.display());
    }
    info!("============================================================");
}

fn print_summary(report: &IngestReport, config: &ReplayConfig, load_secs: f64) {
    info!(
        "Loaded {} records in {:.1}s ({} rows read, {} skipped)",
        report.records.len(),
        load_secs,
        report.rows_read,
        report.skipped
    );

    match report.depth_range_ft() {
        Some((lo, hi)) => info!(
            "Depth range: {:.0} - {:.0} ft ({:.0} - {:.0} m)",
            lo,
            hi,
            lo * FEET_TO_METRES,
            hi * FEET_TO_METRES
        ),
        None => warn!("No positive bit depth in the recording"),
    }

    if let Some(span) = &report.time_span {
        info!("Time span: {} -> {}", span.first, span.last);
    }

    let duration = report.replay_duration(config.speed).as_secs_f64();
    info!(
        "Replay duration at {}x: {:.0}s ({:.1} hours)",
        config.speed,
        duration,
        duration / 3600.0
    );
}

fn print_wells(dir: &Path, json: bool) -> Result<()> {
    let wells = list_wells(dir).with_context(|| format!("Failed to list {}", dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&wells)?);
        return Ok(());
    }

    if wells.is_empty() {
        println!("No CSV files found in {}", dir.display());
        return Ok(());
    }

    println!("Available wells in {}:", dir.display());
    for well in &wells {
        println!(
            "  {:<40} {:>8.1} MB  ~{} records",
            well.name,
            well.size_mb(),
            well.estimated_records
        );
    }
    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
