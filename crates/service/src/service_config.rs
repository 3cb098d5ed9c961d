use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::auth::SESSION_TTL;

/// Process configuration, assembled by the binary and passed in explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the HTTP API server.
    pub api_port: u16,

    /// Root directory of the blob volume.
    pub storage_dir: PathBuf,

    /// Path to the sqlite database; if not set an in-memory database is
    /// used (dev only, state is lost on restart).
    pub sqlite_path: Option<PathBuf>,

    /// Lifetime of session tokens.
    pub session_ttl: Duration,

    /// Number of thumbnail pipeline workers.
    pub pipeline_workers: usize,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (stdout only if not set).
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub(crate) fn database_url(&self) -> Result<Url, url::ParseError> {
        match &self.sqlite_path {
            Some(path) => Url::parse(&format!("sqlite://{}", path.display())),
            None => Url::parse("sqlite::memory:"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_port: 5000,
            storage_dir: PathBuf::from("/tmp/cabinet"),
            sqlite_path: None,
            session_ttl: SESSION_TTL,
            pipeline_workers: 2,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
