//! Logging bootstrap for the board core.
//!
//! # Responsibility
//! - Start rotating file logs once per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Initialization is idempotent for an identical level and directory.
//! - Any attempt to switch level or directory after start is rejected.
//! - Initialization never panics.
//! - Core events carry ids, counts and durations only; never user text.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "taskboard";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Logging setup failure.
#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory(String),
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// Logging already runs with a different configuration.
    AlreadyInitialized {
        active_level: &'static str,
        active_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(message) => write!(f, "invalid log directory: {message}"),
            Self::CreateDirectory { path, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                path.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::AlreadyInitialized {
                active_level,
                active_dir,
            } => write!(
                f,
                "logging already initialized with level `{active_level}` at `{}`; refusing to switch",
                active_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Starts file logging at `level` inside the absolute directory `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` / `InvalidDirectory` for bad input.
/// - `CreateDirectory` / `Backend` when the logger cannot start.
/// - `AlreadyInitialized` when called again with a different configuration.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    if let Some(state) = LOGGING_STATE.get() {
        return ensure_same_config(state, level, &log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, &log_dir))?;
    ensure_same_config(state, level, &log_dir)
}

/// Active `(level, log_dir)`, or `None` before `init_logging` succeeded.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: &Path) -> Result<LoggingState, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDirectory {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();
    info!(
        "event=core_init module=core status=ok level={level} log_dir={} version={}",
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn ensure_same_config(
    state: &LoggingState,
    level: &'static str,
    log_dir: &Path,
) -> Result<(), LoggingError> {
    if state.level == level && state.log_dir == log_dir {
        return Ok(());
    }
    Err(LoggingError::AlreadyInitialized {
        active_level: state.level,
        active_dir: state.log_dir.clone(),
    })
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::InvalidDirectory(
            "path must not be empty".to_string(),
        ));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::InvalidDirectory(format!(
            "path must be absolute, got `{trimmed}`"
        )));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payloads may echo board or task text; keep one capped line only.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut truncated: String = single_line.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
