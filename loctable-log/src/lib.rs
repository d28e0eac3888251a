//! loctable Logging
//!
//! Diagnostic channel for the loctable localization engine. Every anomaly the
//! engine tolerates (malformed CSV rows, unknown keys, out-of-range cells,
//! unresolvable languages) is reported here instead of being returned as an
//! error, so hosts decide how loud the engine should be.
//!
//! # Usage
//!
//! ```rust
//! use loctable_log::{debug, info, warn, error};
//!
//! info!("Loaded table with {} rows", 42);
//! warn!(target: "loctable::csv", "Row {} has {} columns", 7, 3);
//! debug!("cache miss");
//! error!("Language '{}' not found", "Klingon");
//! ```
//!
//! # Environment Variables
//!
//! - `LOCTABLE_DEBUG=1` - Enable debug logging
//! - `LOCTABLE_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `LOCTABLE_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `LOCTABLE_LOG_COLOR=1|0` - Enable/disable colors
//! - `LOCTABLE_LOG_TIMESTAMPS=1|0` - Include timestamps
//! - `LOCTABLE_LOG_MODULE=1|0` - Include the log target
//!
//! # Sinks
//!
//! By default records go to stderr. A host can install its own sink with
//! [`set_sink`], and tests can collect everything logged on the current thread
//! with [`capture`].

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::env;
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level (least verbose)
    Error = 4,
    /// Off (no logging)
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Upper-case level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    #[cfg(feature = "color")]
    fn colored(&self) -> colored::ColoredString {
        use colored::Colorize;
        match self {
            Level::Trace => "TRACE".magenta(),
            Level::Debug => "DEBUG".blue(),
            Level::Info => "INFO".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERROR".red().bold(),
            Level::Off => "OFF".white(),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format of the default stderr sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human readable, optionally colored
    Pretty,
    /// Single short line per record
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Records and sinks
// ============================================================================

/// A single emitted log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Severity
    pub level: Level,
    /// Log target, usually a `loctable::*` component name
    pub target: String,
    /// Rendered message
    pub message: String,
    /// RFC 3339 timestamp (UTC)
    pub timestamp: String,
}

impl Record {
    fn new(level: Level, target: &str, message: &str) -> Self {
        Self {
            level,
            target: target.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Destination for log records replacing the default stderr writer.
pub type Sink = Arc<dyn Fn(&Record) + Send + Sync>;

static SINK: Lazy<RwLock<Option<Sink>>> = Lazy::new(|| RwLock::new(None));

thread_local! {
    static CAPTURED: RefCell<Option<Vec<Record>>> = const { RefCell::new(None) };
}

/// Route all records to `sink` instead of stderr.
pub fn set_sink(sink: Sink) {
    *SINK.write() = Some(sink);
}

/// Restore the default stderr output.
pub fn clear_sink() {
    *SINK.write() = None;
}

/// Run `f` and return every record logged on this thread while it ran.
///
/// Captured records bypass the level filter and are not forwarded to the sink.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Record>) {
    let previous = CAPTURED.with(|c| c.borrow_mut().replace(Vec::new()));
    let result = f();
    let records = CAPTURED.with(|c| {
        let mut slot = c.borrow_mut();
        let records = slot.take().unwrap_or_default();
        *slot = previous;
        records
    });
    (result, records)
}

fn is_capturing() -> bool {
    CAPTURED.with(|c| c.borrow().is_some())
}

// ============================================================================
// Global Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Output configuration of the default stderr sink.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether debug mode is enabled
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether colors are enabled
    pub color: bool,
    /// Whether to include timestamps
    pub timestamps: bool,
    /// Whether to include the target
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Pretty,
            color: false,
            timestamps: true,
            module_path: true,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Build the configuration from `LOCTABLE_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = env_flag("LOCTABLE_DEBUG").unwrap_or(false);

        let level = env::var("LOCTABLE_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("LOCTABLE_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(defaults.format);

        let color = env_flag("LOCTABLE_LOG_COLOR")
            .unwrap_or_else(|| env::var("NO_COLOR").is_err() && std::io::stderr().is_terminal());

        let config = Self {
            debug,
            level,
            format,
            color,
            timestamps: env_flag("LOCTABLE_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps),
            module_path: env_flag("LOCTABLE_LOG_MODULE").unwrap_or(defaults.module_path),
        };

        DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
        LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);

        config
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Read the environment eagerly instead of on the first record.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// Check if debug logging is enabled.
#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Check if records of `level` pass the global filter.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Whether a record of `level` would be emitted or captured.
#[doc(hidden)]
#[inline]
pub fn enabled(level: Level) -> bool {
    is_level_enabled(level) || (level == Level::Debug && is_debug_enabled()) || is_capturing()
}

/// Current global level.
pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set the global level at runtime.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Enable or disable debug mode at runtime.
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

/// The environment-derived output configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Log Output
// ============================================================================

/// Emit a record. Called by the macros.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    let config = config();
    let record = Record::new(level, target, message);

    let captured = CAPTURED.with(|c| match c.borrow_mut().as_mut() {
        Some(records) => {
            records.push(record.clone());
            true
        }
        None => false,
    });
    if captured {
        return;
    }

    if !is_level_enabled(level) && !(level == Level::Debug && is_debug_enabled()) {
        return;
    }

    let sink = SINK.read().clone();
    if let Some(sink) = sink {
        sink(&record);
        return;
    }

    match config.format {
        Format::Pretty => write_pretty(&record, config),
        Format::Compact => write_compact(&record, config),
        Format::Json => write_json(&record),
    }
}

fn write_pretty(record: &Record, config: &LogConfig) {
    let mut stderr = std::io::stderr().lock();

    if config.timestamps {
        let now = chrono::Local::now();
        let _ = write!(stderr, "{} ", now.format("%Y-%m-%d %H:%M:%S%.3f"));
    }

    #[cfg(feature = "color")]
    if config.color {
        let _ = write!(stderr, "{:5} ", record.level.colored());
    } else {
        let _ = write!(stderr, "{:5} ", record.level.as_str());
    }

    #[cfg(not(feature = "color"))]
    let _ = write!(stderr, "{:5} ", record.level.as_str());

    if config.module_path && !record.target.is_empty() {
        let _ = write!(stderr, "[{}] ", record.target);
    }

    let _ = writeln!(stderr, "{}", record.message);
}

fn write_compact(record: &Record, config: &LogConfig) {
    let mut stderr = std::io::stderr().lock();

    if config.timestamps {
        let now = chrono::Local::now();
        let _ = write!(stderr, "{} ", now.format("%H:%M:%S"));
    }

    let _ = write!(
        stderr,
        "{} ",
        record.level.as_str().chars().next().unwrap_or('?')
    );

    if config.module_path && !record.target.is_empty() {
        let _ = write!(stderr, "{}: ", record.target);
    }

    let _ = writeln!(stderr, "{}", record.message);
}

#[cfg(feature = "json")]
fn write_json(record: &Record) {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Entry<'a> {
        timestamp: &'a str,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let entry = Entry {
        timestamp: &record.timestamp,
        level: record.level.as_str(),
        target: &record.target,
        message: &record.message,
    };

    if let Ok(json) = serde_json::to_string(&entry) {
        eprintln!("{}", json);
    }
}

#[cfg(not(feature = "json"))]
fn write_json(record: &Record) {
    eprintln!(
        r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}"}}"#,
        record.timestamp,
        record.level.as_str(),
        escape_json(&record.target),
        escape_json(&record.message)
    );
}

#[cfg(not(feature = "json"))]
fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result
}

// ============================================================================
// Macros
// ============================================================================

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log a debug message.
///
/// Emitted when `LOCTABLE_DEBUG=1` or `LOCTABLE_LOG_LEVEL=debug`.
///
/// ```rust
/// use loctable_log::debug;
///
/// let row = 12;
/// debug!(target: "loctable::i18n", "cache miss for row {}", row);
/// ```
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, module_path!(), &format!($($arg)+));
        }
    };
}

// ============================================================================
// Tests
// ============================================================================
