//! # Logging Utilities
//!
//! Logging setup for Tether using `tracing`.
//!
//! `tether-core` emits:
//! - `trace` for every request handed to the kernel
//! - `debug` for attach, detach, kill, resumes, option changes and unsupported calls
//! - `warn` when the kernel reports a failure that fits no known category
//!
//! Nothing is printed unless a subscriber is installed, which is what the
//! functions here do.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tether_utils::init_logging;
//!
//! // Reads RUST_LOG, TETHER_LOG_LEVEL, TETHER_LOG_FORMAT and TETHER_LOG_FILE
//! init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("tracer started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Level filter (e.g. `RUST_LOG=debug`, `RUST_LOG=tether_core=trace`)
//! - `TETHER_LOG_LEVEL`: Single level applied to every target, overriding `RUST_LOG`
//! - `TETHER_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `TETHER_LOG_FILE`: Optional path of an extra, daily-rolled log file
//! - `TETHER_LOG_DIR`: Directory used by [`init_logging_to_file`]
//!   (default: `~/.tether`, or the system temp directory without `HOME`)

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::MakeWriter;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable holding a level that overrides `RUST_LOG`
pub const LOG_LEVEL_ENV: &str = "TETHER_LOG_LEVEL";
/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "TETHER_LOG_FORMAT";
/// Environment variable naming an extra log file
pub const LOG_FILE_ENV: &str = "TETHER_LOG_FILE";
/// Environment variable naming the directory for [`init_logging_to_file`]
pub const LOG_DIR_ENV: &str = "TETHER_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level, shows every ptrace request
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Initialize logging from the environment
///
/// Logs go to stdout, and additionally to `TETHER_LOG_FILE` when it is set.
///
/// ## Errors
///
/// Returns an error if:
/// - A global subscriber is already installed
/// - `TETHER_LOG_FORMAT` holds an unknown format
/// - `TETHER_LOG_LEVEL` holds an unknown level
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = format_from_env(env::var(LOG_FORMAT_ENV).ok())?;
    let level = level_from_env(env::var(LOG_LEVEL_ENV).ok())?;

    init_console(format, level)
}

/// Initialize logging with an explicit level and format
///
/// `RUST_LOG` is ignored; `TETHER_LOG_FILE` is still honoured.
///
/// ## Example
///
/// ```rust,no_run
/// use tether_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// init_logging_with_level(LogLevel::Trace, LogFormat::Json).expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_console(format, Some(level.into()))
}

/// Initialize file-only logging and return the file's path
///
/// Nothing is written to stdout or stderr. The file is named
/// `YYYY-MM-DD-tether.log` and lives in `TETHER_LOG_DIR`, `~/.tether`, or the
/// system temp directory, in that order of preference.
///
/// `level` overrides `RUST_LOG` when given.
///
/// ## Errors
///
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging_to_file(level: Option<LogLevel>) -> Result<PathBuf, LoggingError>
{
    let dir = resolve_log_dir(env::var_os(LOG_DIR_ENV), env::var_os("HOME"));
    std::fs::create_dir_all(&dir)?;

    let log_file = dir.join(format!("{}-tether.log", Utc::now().format("%Y-%m-%d")));
    // The date is already in the file name, so the appender never rolls.
    let appender = tracing_appender::rolling::never(&dir, file_name_of(&log_file));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Dropping the guard would stop the background writer.
    std::mem::forget(guard);

    let filter = build_filter(level.map(Into::into));
    Registry::default()
        .with(output_layer(LogFormat::Pretty, writer, false, filter))
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok(log_file)
}

/// Install a subscriber that writes through the test harness
///
/// Output is captured per test and shown only for failing tests. Safe to call
/// from every test: only the first call installs anything.
pub fn init_test_logging()
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(Some(Level::DEBUG)))
        .with_test_writer()
        .try_init();
}

fn init_console(format: LogFormat, explicit_level: Option<Level>) -> Result<(), LoggingError>
{
    let mut layers: Vec<BoxedLayer> = vec![output_layer(format, io::stdout, true, build_filter(explicit_level))];

    if let Some(path) = env::var_os(LOG_FILE_ENV).map(PathBuf::from) {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let appender = tracing_appender::rolling::daily(dir, file_name_of(&path));
        let (writer, guard) = tracing_appender::non_blocking(appender);
        std::mem::forget(guard);
        layers.push(output_layer(format, writer, false, build_filter(explicit_level)));
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}

/// Unset or empty selects the default format
fn format_from_env(value: Option<String>) -> Result<LogFormat, LoggingError>
{
    match value.filter(|v| !v.is_empty()) {
        Some(value) => LogFormat::from_str(&value).map_err(LoggingError::InvalidFormat),
        None => Ok(LogFormat::default()),
    }
}

/// Unset or empty leaves the level to `RUST_LOG`
fn level_from_env(value: Option<String>) -> Result<Option<Level>, LoggingError>
{
    value
        .filter(|v| !v.is_empty())
        .map(|value| LogLevel::from_str(&value).map(Level::from).map_err(LoggingError::InvalidLevel))
        .transpose()
}

/// Filter priority: explicit level, then `RUST_LOG`, then `info`
fn build_filter(explicit_level: Option<Level>) -> EnvFilter
{
    match explicit_level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
    }
}

fn output_layer<W>(format: LogFormat, writer: W, ansi: bool, filter: EnvFilter) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(ansi);

    match format {
        LogFormat::Pretty => base.with_filter(filter).boxed(),
        LogFormat::Json => base
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// `TETHER_LOG_DIR`, else `$HOME/.tether`, else the temp directory
fn resolve_log_dir(explicit: Option<OsString>, home: Option<OsString>) -> PathBuf
{
    match (explicit, home) {
        (Some(dir), _) if !dir.is_empty() => PathBuf::from(dir),
        (_, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".tether"),
        _ => env::temp_dir(),
    }
}

fn file_name_of(path: &Path) -> &Path
{
    path.file_name().map_or(Path::new("tether.log"), Path::new)
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("TRACE").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_format_from_env()
    {
        assert_eq!(format_from_env(None).unwrap(), LogFormat::Pretty);
        assert_eq!(format_from_env(Some(String::new())).unwrap(), LogFormat::Pretty);
        assert_eq!(format_from_env(Some("json".into())).unwrap(), LogFormat::Json);
        assert!(matches!(
            format_from_env(Some("xml".into())),
            Err(LoggingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_level_from_env()
    {
        assert_eq!(level_from_env(None).unwrap(), None);
        assert_eq!(level_from_env(Some(String::new())).unwrap(), None);
        assert_eq!(level_from_env(Some("trace".into())).unwrap(), Some(Level::TRACE));
        assert_eq!(level_from_env(Some("Warn".into())).unwrap(), Some(Level::WARN));

        let err = level_from_env(Some("verbose".into())).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLevel(_)));
        assert!(err.to_string().starts_with("Invalid log level: Unknown log level: verbose"));
    }

    #[test]
    fn test_log_dir_prefers_explicit_directory()
    {
        let dir = resolve_log_dir(Some("/var/log/tether".into()), Some("/home/user".into()));
        assert_eq!(dir, PathBuf::from("/var/log/tether"));
    }

    #[test]
    fn test_log_dir_falls_back_to_home_then_temp()
    {
        assert_eq!(
            resolve_log_dir(None, Some("/home/user".into())),
            PathBuf::from("/home/user/.tether")
        );
        assert_eq!(resolve_log_dir(Some(OsString::new()), None), env::temp_dir());
    }

    #[test]
    fn test_file_name_of()
    {
        assert_eq!(file_name_of(Path::new("/tmp/trace.log")), Path::new("trace.log"));
        assert_eq!(file_name_of(Path::new("/")), Path::new("tether.log"));
    }

    #[test]
    fn test_init_test_logging_is_idempotent()
    {
        init_test_logging();
        init_test_logging();
        tracing::debug!("still alive");
    }
}
