//! `lspmon`: live terminal dashboard for MPLS label-switched paths.
//!
//! Polls a fleet of devices on a fixed interval through a small worker pool
//! and renders every ingress LSP in one sortable, filterable table. With
//! `--csv` it polls each device once and writes the LSPs out instead.
//!
//! Logs are written to a file (default `/tmp/lspmon.log`) to avoid
//! corrupting the terminal UI.

mod app;
mod dashboard;
mod event;
mod filter_prompt;
mod hosts;
mod keymap;
mod theme;
mod tui;
mod ui;

use std::fs::File;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use lspmon_core::{CommandDevice, DeviceHandle, export::write_csv, poller};
use regex::Regex;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::dashboard::Dashboard;

const STDOUT_TARGET: &str = "-";

/// Monitor MPLS label-switched paths across a fleet of routers.
#[derive(Parser, Debug)]
#[command(name = "lspmon", version, about)]
struct Cli {
    /// Device address or hostname (repeatable)
    #[arg(short = 'd', long = "host", value_name = "HOST")]
    hosts: Vec<String>,

    /// Only poll inventory hosts whose name matches
    #[arg(short = 'l', long, value_name = "REGEX")]
    limit: Option<Regex>,

    /// Configuration file (defaults to the platform config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seconds between polls of one device
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Number of concurrent pollers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Print the resolved device addresses and exit
    #[arg(long)]
    list_hosts: bool,

    /// Poll every device once and write CSV to FILE (stdout if omitted)
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = STDOUT_TARGET)]
    csv: Option<PathBuf>,

    /// Log file path (defaults to /tmp/lspmon.log)
    #[arg(long, default_value = "/tmp/lspmon.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may go to stdout/stderr while the
/// dashboard owns the terminal. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lspmon={log_level},lspmon_core={log_level},lspmon_config={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lspmon.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

fn build_devices(
    addresses: &[IpAddr],
    config: &lspmon_config::Config,
) -> Result<Vec<CommandDevice>> {
    let device_config = config.device_config()?;
    Ok(addresses
        .iter()
        .map(|addr| CommandDevice::new(addr.to_string(), Arc::clone(&device_config)))
        .collect())
}

async fn export_csv(devices: Vec<CommandDevice>, target: &Path) -> Result<()> {
    let mut snapshots = Vec::with_capacity(devices.len());
    for (device, outcome) in poller::poll_once(devices).await {
        match outcome {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => {
                warn!(%device, error = %e, "poll failed");
                eprintln!("{device}: {e}");
            }
        }
    }

    let rows = if target == Path::new(STDOUT_TARGET) {
        write_csv(io::stdout().lock(), &snapshots)?
    } else {
        let file = File::create(target)
            .wrap_err_with(|| format!("cannot create {}", target.display()))?;
        write_csv(file, &snapshots)?
    };
    info!(rows, target = %target.display(), "csv export written");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = match &cli.config {
        Some(path) => lspmon_config::load_config_from(path)?,
        None => lspmon_config::load_config()?,
    };
    let inventory = Arc::new(config.inventory());

    let names = hosts::select(&cli.hosts, cli.limit.as_ref(), &inventory, &config.devices);
    if names.is_empty() {
        bail!(
            "no devices to poll: pass --host or --limit, or list devices in {}",
            lspmon_config::config_path().display()
        );
    }
    let (addresses, failures) = hosts::resolve_all(&names, &inventory).await;
    for failure in &failures {
        warn!(error = %failure, "skipping device");
        eprintln!("skipping {failure}");
    }
    if addresses.is_empty() {
        bail!("none of the requested devices could be resolved");
    }

    if cli.list_hosts {
        for addr in &addresses {
            println!("{addr}");
        }
        return Ok(());
    }

    let devices = build_devices(&addresses, &config)?;
    if let Some(target) = &cli.csv {
        return export_csv(devices, target).await;
    }

    let mut poller_config = config.poller_config();
    if let Some(secs) = cli.interval {
        poller_config.interval = Duration::from_secs(secs);
    }
    if let Some(workers) = cli.workers {
        poller_config.workers = workers;
    }

    info!(devices = devices.len(), "starting lspmon");
    let ids: Vec<_> = devices.iter().map(|d| d.id().clone()).collect();
    let (poller, outputs) = poller::start(devices, &poller_config);
    let dashboard = Dashboard::new(ids, inventory);

    App::new(dashboard, poller, outputs, config.shutdown_grace())
        .run()
        .await
}
