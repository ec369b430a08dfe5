//! Logging configuration module
//! Structured logging with a console layer and an optional rolling JSON file

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for rolling log files
    pub file_path: Option<PathBuf>,
    /// Log rotation policy
    pub rotation: LogRotation,
    /// Use JSON formatting on the console
    pub json_format: bool,
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Initialize logging based on configuration
    ///
    /// The returned guard flushes the file writer on drop and must be held
    /// for the lifetime of the process.
    pub fn init(&self) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
        let env_filter =
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.level))?;

        // Logs go to stderr so operation output on stdout stays machine readable
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(!self.json_format)
            .with_writer(io::stderr);

        let (file_layer, guard) = match self.file_path {
            Some(ref path) => {
                let file_appender = match self.rotation {
                    LogRotation::Hourly => rolling::hourly(path, "kubelink.log"),
                    LogRotation::Daily => rolling::daily(path, "kubelink.log"),
                    LogRotation::Never => rolling::never(path, "kubelink.log"),
                };
                let (writer, guard) = non_blocking(file_appender);

                let layer = fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(false)
                    .json()
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        let registry = tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer);

        if self.json_format {
            registry.with(console_layer.json()).try_init()?;
        } else {
            registry.with(console_layer).try_init()?;
        }

        tracing::debug!(level = %self.level, "Logging initialized");

        Ok(guard)
    }
}

/// Log a cluster operation with its target
#[macro_export]
macro_rules! log_cluster_operation {
    ($op:expr, $namespace:expr, $name:expr) => {
        tracing::info!(
            operation = $op,
            namespace = %$namespace,
            name = %$name,
            "Cluster operation"
        )
    };
    ($op:expr, $namespace:expr, $name:expr, $($key:ident = $value:expr),+) => {
        tracing::info!(
            operation = $op,
            namespace = %$namespace,
            name = %$name,
            $($key = $value),+,
            "Cluster operation"
        )
    };
}
