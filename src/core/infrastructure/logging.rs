//! Console and log-file output through `tracing`.

use crate::core::domain::error::{ProxmoxError, ProxmoxResult};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Force `debug` level regardless of `RUST_LOG`.
    pub verbose: bool,
    /// ANSI colors on the console layer.
    pub color: bool,
    /// Plain-text log file, appended to.
    pub file: Option<PathBuf>,
}

impl LogOptions {
    fn filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug,hyper=info,hyper_util=info,reqwest=info,rustls=info")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        }
    }
}

/// Installs the global subscriber: stderr console layer plus optional file layer.
///
/// # Errors
/// `ProxmoxError::Io` when the log file cannot be opened,
/// `ProxmoxError::Configuration` when a subscriber is already installed.
pub fn init_logging(options: &LogOptions) -> ProxmoxResult<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(options.color)
        .with_target(false);

    let file_layer = match &options.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(options.filter())
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| ProxmoxError::Configuration(format!("Cannot install logger: {}", e)))
}
