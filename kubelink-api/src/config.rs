//! Configuration management for the Kubelink connector
//!
//! Settings are resolved from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)
//!
//! The connection section mirrors the platform's connection table. It is
//! read at the start of every operation and never written back.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct for the connector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Cluster API connection settings
    pub connection: ConnectionSettings,
    /// Operation defaults
    pub defaults: DefaultsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Cluster API connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// API server host, with or without scheme
    pub server_name: String,
    /// API server port
    pub server_port: u16,
    /// Use an SSL connection
    pub use_ssl: bool,
    /// User name for basic authentication
    pub username: String,
    /// Password for basic authentication
    pub password: String,
    /// Timeout (milliseconds) to execute a request
    pub timeout_ms: u64,
    /// Build the client from this kubeconfig file instead of the URL settings
    pub kubeconfig: Option<PathBuf>,
    /// Probe the API server version when connecting
    pub verify_on_connect: bool,
    /// Skip TLS certificate validation when `use_ssl` is set
    pub accept_invalid_certs: bool,
}

/// Defaults applied by the operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Namespace used when the caller passes none
    pub namespace: String,
    /// Manifest read by createDeployment when no path is given
    pub manifest_path: PathBuf,
    /// Server-side timeout for list requests, in seconds
    pub list_timeout_secs: u32,
    /// Number of recent log lines returned by getPodLogs
    pub log_tail_lines: i64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            server_name: "http://127.0.0.1".to_string(),
            server_port: 8001,
            use_ssl: false,
            username: "kubeuser".to_string(),
            password: String::new(),
            timeout_ms: 60_000,
            kubeconfig: None,
            verify_on_connect: false,
            accept_invalid_certs: false,
        }
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("server_name", &self.server_name)
            .field("server_port", &self.server_port)
            .field("use_ssl", &self.use_ssl)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("kubeconfig", &self.kubeconfig)
            .field("verify_on_connect", &self.verify_on_connect)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ConnectionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            manifest_path: PathBuf::from("/data/deploy.yml"),
            list_timeout_secs: 180,
            log_tail_lines: 40,
        }
    }
}

impl ConnectorConfig {
    /// Load configuration from the standard locations and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, preferring an explicit file over the standard locations
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::find_config_file) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("KUBELINK_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/kubelink/config.toml")),
            Some(PathBuf::from("./kubelink.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Connection
        if let Some(server) = lookup("KUBELINK_SERVER_NAME") {
            self.connection.server_name = server;
        }
        if let Some(port) = lookup("KUBELINK_SERVER_PORT").and_then(|p| p.parse().ok()) {
            self.connection.server_port = port;
        }
        if let Some(ssl) = lookup("KUBELINK_USE_SSL") {
            self.connection.use_ssl = ssl.parse().unwrap_or(false);
        }
        if let Some(user) = lookup("KUBELINK_USERNAME") {
            self.connection.username = user;
        }
        if let Some(password) = lookup("KUBELINK_PASSWORD") {
            self.connection.password = password;
        }
        if let Some(timeout) = lookup("KUBELINK_TIMEOUT_MS").and_then(|t| t.parse().ok()) {
            self.connection.timeout_ms = timeout;
        }
        if let Some(path) = lookup("KUBERNETES_KUBECONFIG_FILE") {
            self.connection.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(verify) = lookup("KUBELINK_VERIFY_ON_CONNECT") {
            self.connection.verify_on_connect = verify.parse().unwrap_or(false);
        }
        if let Some(insecure) = lookup("KUBELINK_ACCEPT_INVALID_CERTS") {
            self.connection.accept_invalid_certs = insecure.parse().unwrap_or(false);
        }

        // Defaults
        if let Some(namespace) = lookup("KUBELINK_DEFAULT_NAMESPACE") {
            self.defaults.namespace = namespace;
        }
        if let Some(path) = lookup("KUBELINK_MANIFEST_PATH") {
            self.defaults.manifest_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("KUBELINK_LIST_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.defaults.list_timeout_secs = secs;
        }
        if let Some(lines) = lookup("KUBELINK_LOG_TAIL_LINES").and_then(|l| l.parse().ok()) {
            self.defaults.log_tail_lines = lines;
        }

        // Logging
        if let Some(level) = lookup("KUBELINK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(dir) = lookup("KUBELINK_LOG_DIR") {
            self.logging.file_path = Some(PathBuf::from(dir));
        }
        if let Some(json) = lookup("KUBELINK_LOG_JSON") {
            self.logging.json_format = json.parse().unwrap_or(false);
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.kubeconfig.is_none() {
            if self.connection.server_name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Server name cannot be empty".to_string(),
                ));
            }
            if self.connection.server_port == 0 {
                return Err(ConfigError::Validation("Port cannot be 0".to_string()));
            }
        }

        if self.connection.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.defaults.namespace.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Default namespace cannot be empty".to_string(),
            ));
        }

        if self.defaults.log_tail_lines <= 0 {
            return Err(ConfigError::Validation(
                "Log tail lines must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Failed to read configuration file
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    Parse(String),
    /// Configuration validation failed
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, err) => {
                write!(f, "Failed to read config file {:?}: {}", path, err)
            }
            ConfigError::Parse(err) => write!(f, "Failed to parse config: {}", err),
            ConfigError::Validation(err) => write!(f, "Config validation failed: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}
