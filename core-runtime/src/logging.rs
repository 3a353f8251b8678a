//! # Logging
//!
//! Provides structured logging with the `tracing` crate, supporting:
//! - JSON, pretty-print and compact output formats
//! - Per-crate level filtering, overridable with a raw `EnvFilter` string
//! - Environment-driven defaults (local / dev / prod)
//! - Credential redaction helpers for values that end up in log fields
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::Environment;
//! use core_runtime::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::for_environment(Environment::Local);
//! init_logging(config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

use crate::config::Environment;
use crate::error::{Error, Result};

use std::io;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Targets that follow [`LoggingConfig::level`]; everything else logs at warn.
const OWN_CRATES: &[&str] = &[
    "core_runtime",
    "core_library",
    "core_service",
    "http_server",
    "songs_server",
];

/// How log lines are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored; for a developer terminal
    Pretty,
    /// One JSON object per line; for log shippers
    Json,
    /// Compact single-line format
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Minimum severity emitted by our own crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Subscriber settings, usually derived from the deployment environment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level for our own crates
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_library=debug,sqlx=info")
    pub filter: Option<String>,
    /// Emit span enter/exit events
    pub enable_spans: bool,
    /// Include the event target (module path)
    pub display_target: bool,
    /// Include thread ids and names
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            enable_spans: false,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults per deployment environment.
    ///
    /// | Environment | Format | Level |
    /// |-------------|--------|-------|
    /// | Local       | Pretty | Debug |
    /// | Dev         | Json   | Debug |
    /// | Prod        | Json   | Info  |
    pub fn for_environment(environment: Environment) -> Self {
        let (format, level) = match environment {
            Environment::Local => (LogFormat::Pretty, LogLevel::Debug),
            Environment::Dev => (LogFormat::Json, LogLevel::Debug),
            Environment::Prod => (LogFormat::Json, LogLevel::Info),
        };

        Self::default().with_format(format).with_level(level)
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Replace the generated per-crate directives with `filter` verbatim.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// Call once at startup. A second call fails because a global subscriber is
/// already set.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let spans = config.enable_spans;
    let target = config.display_target;
    let threads = config.display_thread_info;

    // Exactly one of these is Some; `Option<Layer>` is itself a no-op layer.
    let pretty = (config.format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_target(target)
            .with_thread_ids(threads)
            .with_thread_names(threads)
            .with_span_events(span_events(spans))
            .with_writer(io::stdout)
    });
    let json = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(spans)
            .with_span_list(spans)
            .with_target(target)
            .with_thread_ids(threads)
            .with_thread_names(threads)
            .with_writer(io::stdout)
    });
    let compact = (config.format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_target(target)
            .with_thread_ids(threads)
            .with_thread_names(threads)
            .with_span_events(span_events(spans))
            .with_writer(io::stdout)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(compact)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

/// Our crates log at the configured level; chatty dependencies only at warn.
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = match &config.filter {
        Some(custom) => custom.clone(),
        None => {
            let level = config.level.as_directive();
            let mut directives = vec!["warn".to_string()];
            directives.extend(OWN_CRATES.iter().map(|krate| format!("{krate}={level}")));
            directives.join(",")
        }
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

fn span_events(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Value to log for a field: secrets are replaced wholesale, URLs lose their
/// embedded credentials.
///
/// ```ignore
/// use tracing::info;
/// use core_runtime::logging::redact_if_sensitive;
///
/// info!(api_key = %redact_if_sensitive("api_key", key), "Calling provider");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    const SENSITIVE_FIELDS: &[&str] = &[
        "token",
        "password",
        "secret",
        "api_key",
        "authorization",
        "bearer",
    ];

    let field_lower = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|&f| field_lower.contains(f)) {
        "[REDACTED]".to_string()
    } else {
        redact_url_credentials(value)
    }
}

/// Mask the `user:password@` part of a connection URL.
///
/// ```
/// use core_runtime::logging::redact_url_credentials;
///
/// assert_eq!(
///     redact_url_credentials("postgres://admin:hunter2@db:5432/songs"),
///     "postgres://[REDACTED]@db:5432/songs"
/// );
/// assert_eq!(redact_url_credentials("sqlite:songs.db"), "sqlite:songs.db");
/// ```
pub fn redact_url_credentials(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &url[authority_start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}[REDACTED]{}", &url[..authority_start], &rest[at..]),
        None => url.to_string(),
    }
}
