//! CLI smoke entry point.
//!
//! # Responsibility
//! - Start file logging before any store work.
//! - Open a task store (file path argument, or in-memory when omitted).
//! - Wire the container and report version and task count.

use std::path::PathBuf;
use std::process::ExitCode;
use tasktrack_core::config::IN_MEMORY_DB_URL;
use tasktrack_core::{
    core_version, default_log_level, init_logging, Container, LoggingError, RequestContext,
    Response, TaskConfig,
};

/// Overrides the log directory; must be absolute.
const LOG_DIR_ENV: &str = "TASKTRACK_LOG_DIR";

fn main() -> ExitCode {
    if let Err(err) = start_logging() {
        eprintln!("tasktrack: logging disabled: {err}");
    }

    let db_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| IN_MEMORY_DB_URL.to_string());
    let config = TaskConfig::new(db_url, "sqlite");

    let container = match Container::from_config(&config) {
        Ok(container) => container,
        Err(err) => {
            eprintln!("tasktrack: {err}");
            return ExitCode::FAILURE;
        }
    };
    let Some(service) = container.task_service() else {
        eprintln!("tasktrack: task service not initialized");
        return ExitCode::FAILURE;
    };

    let listing = service.get_all_tasks(&RequestContext::new());
    if !listing.success() {
        eprintln!("tasktrack: {listing}");
        return ExitCode::FAILURE;
    }

    println!("tasktrack_core version={}", core_version());
    println!("tasktrack_core tasks={}", listing.tasks.len());
    log::debug!("event=cli_probe module=cli status=ok");
    ExitCode::SUCCESS
}

fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("tasktrack").join("logs"))
}

fn start_logging() -> Result<(), LoggingError> {
    let dir = log_dir();
    init_logging(default_log_level(), &dir.to_string_lossy())
}
