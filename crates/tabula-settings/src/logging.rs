//! Logging setup for Tabula binaries
//!
//! Console output is pretty-printed for people; the file layer writes JSON
//! lines through a daily rolling appender. `RUST_LOG` overrides the
//! configured filter.

use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where log files are written
    pub log_dir: PathBuf,

    /// JSON lines to a daily file
    pub enable_json_logs: bool,

    /// Pretty output on stderr
    pub enable_console_logs: bool,

    /// Include file/line information
    pub include_location: bool,

    /// Log span creation and close
    pub enable_spans: bool,

    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

fn default_log_dir() -> PathBuf {
    crate::log_dir().unwrap_or_else(|_| PathBuf::from("logs"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            enable_json_logs: true,
            enable_console_logs: true,
            include_location: cfg!(debug_assertions),
            enable_spans: cfg!(debug_assertions),
            default_filter: "info,tabula_core=debug,tabula_fields=debug,tabula_filters=debug,tabula_admin=debug,tabula_services=debug,tabula_cli=debug".to_string(),
        }
    }
}

impl LoggingConfig {
    /// JSON file logs only, no console output
    pub fn production() -> Self {
        Self {
            log_dir: default_log_dir(),
            enable_json_logs: true,
            enable_console_logs: false,
            include_location: false,
            enable_spans: false,
            default_filter: "warn,tabula_services=info,tabula_admin=info".to_string(),
        }
    }

    pub fn development() -> Self {
        Self::default()
    }

    /// Console only, no files
    pub fn testing() -> Self {
        Self {
            log_dir: std::env::temp_dir().join("tabula-tests"),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: true,
            enable_spans: true,
            default_filter: "debug".to_string(),
        }
    }

    /// Quiet console output for command-line tools
    pub fn cli(verbose: bool) -> Self {
        Self {
            enable_json_logs: false,
            enable_spans: false,
            include_location: false,
            default_filter: if verbose { "debug" } else { "warn" }.to_string(),
            ..Self::default()
        }
    }
}

/// Initialize the global subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    // NEW fires once per span; ENTER would repeat on every poll of an awaited future.
    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events.clone())
            .with_ansi(true)
            .pretty()
            .with_filter(env_filter.clone())
            .boxed();

        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "tabula.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The guard flushes on drop and must outlive every log call
        std::mem::forget(guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();

        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::info!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "logging initialized"
    );

    Ok(())
}

/// Initialize with the development or production preset, by build profile
pub fn init_default() -> anyhow::Result<()> {
    let config = if cfg!(debug_assertions) {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };

    init(config)
}
