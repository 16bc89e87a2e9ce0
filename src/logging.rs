//! Logging Module
//!
//! Structured logging with file output for diagnostics.

use tracing_subscriber::{fmt, EnvFilter, prelude::*};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::PathBuf;

/// Initialize logging with console and file output
pub fn init() {
    let log_dir = log_directory();

    // Ensure log directory exists
    let _ = std::fs::create_dir_all(&log_dir);

    // Daily rotation keeps the directory bounded
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "routegenius.log");

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_appender);

    // Console output only in debug builds; the shell stays clean in release
    let console_layer = cfg!(debug_assertions).then(|| fmt::layer().with_target(true).pretty());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("debug,hyper=warn,reqwest=warn")
        } else {
            EnvFilter::new("info,hyper=warn,reqwest=warn")
        }
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("RouteGenius")
        .join("logs")
}
