//! # fwcheck
//!
//! Firmware-version popup checker.
//!
//! Watches a vendor tool's firmware-info popup through two independent
//! Windows accessibility backends, extracts the firmware version, compares
//! it against the operator-entered expected value, and records the outcome
//! (history table, audio feedback, console).
//!
//! ## Architecture
//!
//! This is the binary layer tying together:
//! - fwcheck-core: core types and configuration
//! - fwcheck-probe: accessibility backends, locator, extractor
//! - fwcheck-engine: check pipeline, polling engine, sinks

mod cli;
mod render;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use fwcheck_core::{CheckerConfig, Verdict};
use fwcheck_engine::{
    AudioSink, CheckRequest, Checker, DeviceWatcher, FanoutSink, HistorySink, HistoryStore,
    Poller, ResultSink, SoundPlayer,
};

use cli::{CheckArgs, Cli, Command};

const DEFAULT_CONFIG_PATH: &str = "fwcheck.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Check(args) => run_check(&config, &args).await,
        Command::Watch(args) => run_watch(&config, args).await,
        Command::History { limit, json } => run_history(&config, limit, json),
    }
}

/// Load configuration: explicit path, then ./fwcheck.yaml, then defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<CheckerConfig> {
    match path {
        Some(path) => CheckerConfig::from_file(path)
            .with_context(|| format!("cannot load config from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                CheckerConfig::from_file(default)
                    .with_context(|| format!("cannot load config from {DEFAULT_CONFIG_PATH}"))
            } else {
                Ok(CheckerConfig::default())
            }
        }
    }
}

/// Merge CLI overrides over the configured keys.
fn request_from(config: &CheckerConfig, args: &CheckArgs) -> CheckRequest {
    let title_key = args
        .title_contains
        .clone()
        .unwrap_or_else(|| config.target.title_contains.clone());
    let content_key = args
        .content_contains
        .clone()
        .unwrap_or_else(|| config.target.content_contains.clone());
    CheckRequest::new(&args.input, title_key, content_key)
}

/// One manual check: locate, extract, compare, record, render.
async fn run_check(config: &CheckerConfig, args: &CheckArgs) -> anyhow::Result<()> {
    let desktop = fwcheck_probe::os::native_desktop()?;
    let checker = Checker::from_config(config)?;
    let request = request_from(config, args);

    let result = checker.check_once(&desktop, &request);

    // Record inline before exiting; a broken store must not hide the result
    match HistoryStore::open(&config.history.path) {
        Ok(store) => {
            if let Err(e) = store.insert(&result) {
                tracing::error!("history insert failed: {e}");
            }
        }
        Err(e) => tracing::error!("history store unavailable: {e}"),
    }

    AudioSink::new(SoundPlayer::from_config(&config.audio)).publish(&result, true);
    render::print_result(&result, args.json)?;

    if result.verdict != Verdict::Ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Poll until interrupted (Ctrl-C), optionally driving the device watcher.
async fn run_watch(config: &CheckerConfig, args: cli::WatchArgs) -> anyhow::Result<()> {
    let desktop = fwcheck_probe::os::native_desktop()?;
    let checker = Checker::from_config(config)?;
    let request = request_from(config, &args.check);

    let store = Arc::new(
        HistoryStore::open(&config.history.path).context("cannot open history store")?,
    );

    let mut fanout = FanoutSink::new();
    fanout.push(Arc::new(HistorySink::new(store)));
    fanout.push(Arc::new(AudioSink::new(SoundPlayer::from_config(
        &config.audio,
    ))));
    fanout.push(Arc::new(render::ConsoleSink::new(args.check.json)));

    let mut poller = Poller::new(desktop, checker, &config.polling);
    poller.start();
    let control = poller.control();

    // Ctrl-C flips the flag; the poll winds down at the next tick boundary
    {
        let control = control.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("stop requested, finishing current tick");
                control.stop();
            }
        });
    }

    if args.watch_device {
        let panel = fwcheck_probe::os::native_device_panel(&config.watcher.app_title_contains)?;
        let mut watcher = DeviceWatcher::new(panel, config.watcher.min_info_len);
        let interval = Duration::from_millis(config.watcher.poll_ms);
        let control = control.clone();
        tokio::spawn(async move {
            watcher.run(interval, control).await;
        });
    }

    poller.run(&request, &fanout).await;
    Ok(())
}

/// Render recent history rows.
fn run_history(config: &CheckerConfig, limit: usize, json: bool) -> anyhow::Result<()> {
    let store =
        HistoryStore::open(&config.history.path).context("cannot open history store")?;
    let rows = store.recent(limit)?;
    render::print_history(&rows, json)
}
