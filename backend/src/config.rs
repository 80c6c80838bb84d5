//! Command-line and environment configuration for the server.

use clap::Parser;
use std::path::PathBuf;

/// Upload ceiling applied when nothing else is configured (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "discbag",
    version,
    about = "Disc golf round tracker with UDisc scorecard import"
)]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "DISCBAG_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "DISCBAG_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file, created if missing
    #[arg(long, env = "DISCBAG_DATABASE", default_value = "discbag.sqlite")]
    pub database: PathBuf,

    /// Largest accepted scorecard upload, in bytes
    #[arg(long, env = "DISCBAG_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "DISCBAG_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn import_limits(&self) -> ImportLimits {
        ImportLimits {
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// Per-request limits for `POST /api/import/udisc`, shared as app data.
#[derive(Debug, Clone, Copy)]
pub struct ImportLimits {
    pub max_upload_bytes: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
