use std::path::PathBuf;

use clap::Parser;

use cabinet_service::{spawn_service, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "cabinet")]
#[command(about = "Authenticated file-object service with thumbnail derivation")]
struct Args {
    /// Port for the HTTP API server
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Root directory of the blob volume
    #[arg(long, default_value = "/tmp/cabinet")]
    storage_dir: PathBuf,

    /// Path to the sqlite database (in-memory if not set)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Number of thumbnail pipeline workers
    #[arg(long, default_value_t = 2)]
    workers: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Directory for log files (stdout only if not set)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = ServiceConfig {
        api_port: args.port,
        storage_dir: args.storage_dir,
        sqlite_path: args.database,
        pipeline_workers: args.workers,
        log_level: args.log_level,
        log_dir: args.log_dir,
        ..ServiceConfig::default()
    };

    spawn_service(&config).await;
}
