//! Event ring watcher.
//!
//! Polls a decoded snapshot of the ledger's event ring and logs every event
//! it has not reported before. Decoding the on-ledger account is someone
//! else's job; this binary only reads the JSON the decoder leaves behind.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (first argument, default `ringview.yaml`)
//! 2. Initialize structured logging (tracing)
//! 3. Load one snapshot to confirm the source is readable
//! 4. Run the poll loop until Ctrl-C or the poll limit
//! 5. Log the final cursor

mod config;
mod error;
mod source;
mod watch;

use std::path::{Path, PathBuf};

use ringview_core::{EventConsumer, SeqCursor};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig, WatchConfig};
use crate::error::WatchError;
use crate::source::{JsonFileSource, SnapshotSource};
use crate::watch::WatchSettings;

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "ringview.yaml";

/// Application entry point for the watcher.
///
/// # Errors
///
/// Returns an error if configuration, logging, or the first snapshot load
/// fails.
#[tokio::main]
async fn main() -> Result<(), WatchError> {
    // 1. Load configuration.
    let explicit_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let (config, from_file) = load_config(&config_path, explicit_path.is_some())?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        config = %config_path.display(),
        from_file,
        snapshot_path = %config.source.snapshot_path.display(),
        interval_ms = config.poll.interval_ms,
        max_polls = config.poll.max_polls,
        "ringview-watch starting"
    );

    // 3. Confirm the source works before settling into the loop.
    let source = JsonFileSource::new(&config.source.snapshot_path);
    let probe = source.load().await?;
    info!(
        path = %source.path().display(),
        capacity = probe.capacity(),
        head = probe.head(),
        count = probe.count(),
        seq_num = probe.seq_num(),
        "snapshot source ready"
    );

    // 4. Run the poll loop.
    let mut consumer = EventConsumer::with_cursor(SeqCursor::from(config.poll.start_after));
    let settings = WatchSettings::from(&config.poll);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let outcome = watch::run_watch(&source, &mut consumer, settings, shutdown).await;

    // 5. Report.
    info!(
        polls = outcome.polls,
        events = outcome.events,
        failures = outcome.failures,
        last_seq_num = ?outcome.cursor.last_seq_num(),
        "ringview-watch stopped"
    );

    Ok(())
}

/// Load configuration.
///
/// Only the implicit default path may be missing, in which case defaults
/// are used. A path given on the command line must exist. Returns the
/// config and whether it came from the file.
fn load_config(path: &Path, explicit: bool) -> Result<(WatchConfig, bool), WatchError> {
    if explicit || path.exists() {
        Ok((WatchConfig::from_file(path)?, true))
    } else {
        let mut config = WatchConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), WatchError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| WatchError::Logging {
            message: format!("invalid log filter {:?}: {e}", logging.level),
        })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match logging.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| WatchError::Logging {
        message: format!("{e}"),
    })
}
