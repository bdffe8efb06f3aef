//! Tracing setup shared by the form, the server and the developer binaries.
//!
//! Each binary logs to stdout and to `<component>_<timestamp>.log` under
//! `.cultivar/logs`. Only the newest files of a component are kept.

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

/// Log files retained per component.
const MAX_LOG_FILES: usize = 10;
const DEFAULT_FILTER: &str = "info";

const FILE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
const LINE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to resolve log directory: {0}")]
    AppDir(#[from] AppDirError),
    #[error("Failed to list log directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove old log file {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber for `component` and return the log file path.
///
/// Repeated calls after a successful install return `Ok(None)`. Callers
/// report errors and keep running with whatever logging is available.
pub fn init(component: &str) -> Result<Option<PathBuf>, LoggingError> {
    if FILE_WRITER_GUARD.get().is_some() {
        return Ok(None);
    }
    let dir = app_dirs::logs_dir()?;
    let path = dir.join(log_file_name(component, now_local_or_utc())?);
    let file = open_log_file(&path)?;
    prune_component_logs(&dir, component, MAX_LOG_FILES)?;

    let (file_writer, guard) = tracing_appender::non_blocking(file);
    let timer = fmt::time::OffsetTime::new(local_offset(), LINE_STAMP);
    let subscriber = Registry::default()
        .with(env_filter())
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_timer(timer.clone())
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = FILE_WRITER_GUARD.set(guard);

    tracing::info!(component, "Writing logs to {}", path.display());
    Ok(Some(path))
}

fn log_file_name(component: &str, now: OffsetDateTime) -> Result<String, LoggingError> {
    Ok(format!("{component}_{}.log", now.format(FILE_STAMP)?))
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Delete the oldest `<component>_*.log` files beyond `keep`.
///
/// File names embed a sortable timestamp, so name order is age order.
fn prune_component_logs(dir: &Path, component: &str, keep: usize) -> Result<(), LoggingError> {
    let prefix = format!("{component}_");
    let listing = fs::read_dir(dir).map_err(|source| LoggingError::ListDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names: Vec<String> = listing
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix) && name.ends_with(".log"))
        .collect();
    names.sort_unstable();
    let excess = names.len().saturating_sub(keep);
    for name in names.into_iter().take(excess) {
        let path = dir.join(name);
        fs::remove_file(&path).map_err(|source| LoggingError::Prune { path, source })?;
    }
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
