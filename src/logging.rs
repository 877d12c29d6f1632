//! File logging via `tracing`.
//!
//! The terminal belongs to the TUI, so events go to a log file under the
//! data directory. Filter comes from `SERENE_FLOW_LOG`, then `RUST_LOG`.

use std::fs;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::error::{Error, Result};

/// Log filter environment variable.
pub const LOG_ENV: &str = "SERENE_FLOW_LOG";

/// Log filename within the data directory.
const LOG_FILENAME: &str = "serene-flow.log";

const DEFAULT_FILTER: &str = "serene_flow=info";

/// Returns the log directory.
///
/// On Linux: ~/.local/share/serene-flow/
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("serene-flow")
}

/// Pick the filter directive: `SERENE_FLOW_LOG`, then `RUST_LOG`, then the default.
fn filter_directive(app: Option<String>, rust_log: Option<String>) -> String {
    app.or(rust_log)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber. Returns the log file path.
pub fn init() -> Result<PathBuf> {
    let dir = log_dir();
    fs::create_dir_all(&dir).map_err(|source| Error::Io {
        path: dir.clone(),
        source,
    })?;
    let path = dir.join(LOG_FILENAME);
    let file = fs::File::create(&path).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    let directive = filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter);

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry().with(file_layer).try_init();

    Ok(path)
}
