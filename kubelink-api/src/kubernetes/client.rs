//! Kubernetes client wrapper
//!
//! Builds a kube-rs Client from stored connection settings. A handle is
//! created per operation and passed explicitly; nothing is cached globally.

use std::path::Path;

use kube::config::{AuthInfo, KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use url::Url;

use super::error::{ConnectorError, ConnectorResult};
use crate::config::ConnectionSettings;

/// Wrapper around kube-rs Client with the endpoint it is bound to
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    api_server: String,
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("api_server", &self.api_server)
            .finish()
    }
}

impl K8sClient {
    /// Create a client from connection settings
    ///
    /// A configured kubeconfig file takes precedence over the URL settings.
    pub async fn connect(settings: &ConnectionSettings) -> ConnectorResult<Self> {
        if let Some(ref path) = settings.kubeconfig {
            return Self::from_kubeconfig_file(path, settings).await;
        }

        let config = build_config(settings)?;
        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config).map_err(|e| {
            ConnectorError::Connection(format!("Failed to create client: {}", e))
        })?;

        tracing::debug!(api_server = %api_server, "Kubernetes client created");

        Ok(Self {
            inner: client,
            api_server,
        })
    }

    /// Create a client from a kubeconfig file, using its current context
    pub async fn from_kubeconfig_file(
        path: &Path,
        settings: &ConnectionSettings,
    ) -> ConnectorResult<Self> {
        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            ConnectorError::Connection(format!(
                "Failed to read kubeconfig {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| ConnectorError::Connection(format!("Invalid kubeconfig: {}", e)))?;
        config.connect_timeout = Some(settings.timeout());
        config.read_timeout = Some(settings.timeout());
    config.accept_invalid_certs = settings.use_ssl && settings.accept_invalid_certs;

        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config).map_err(|e| {
            ConnectorError::Connection(format!("Failed to create client: {}", e))
        })?;

        tracing::debug!(api_server = %api_server, kubeconfig = %path.display(), "Kubernetes client created");

        Ok(Self {
            inner: client,
            api_server,
        })
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Get the API server version, e.g. "v1.32.1"
    pub async fn get_version(&self) -> ConnectorResult<String> {
        let version = self
            .inner
            .apiserver_version()
            .await
            .map_err(ConnectorError::cluster("apiserver_version"))?;

        Ok(version.git_version)
    }
}

/// Normalise the configured host into the API server URL
///
/// The scheme always follows `use_ssl` and the port always follows
/// `server_port`, whatever the host string already carries.
pub fn endpoint(settings: &ConnectionSettings) -> ConnectorResult<Url> {
    let raw = settings.server_name.trim();
    let host = raw
        .split_once("://")
        .map_or(raw, |(_, rest)| rest)
        .trim_end_matches('/');

    if host.is_empty() {
        return Err(ConnectorError::Connection(
            "Server name cannot be empty".to_string(),
        ));
    }

    let scheme = if settings.use_ssl { "https" } else { "http" };
    let mut url = Url::parse(&format!("{}://{}", scheme, host)).map_err(|e| {
        ConnectorError::Connection(format!("Invalid server name '{}': {}", raw, e))
    })?;

    if url.host_str().is_none() {
        return Err(ConnectorError::Connection(format!(
            "Server name '{}' has no host",
            raw
        )));
    }

    url.set_port(Some(settings.server_port)).map_err(|_| {
        ConnectorError::Connection(format!("Cannot set port on '{}'", raw))
    })?;

    Ok(url)
}

/// Build the kube-rs configuration for URL-based settings
pub fn build_config(settings: &ConnectionSettings) -> ConnectorResult<Config> {
    let url = endpoint(settings)?;
    let uri: http::Uri = url
        .as_str()
        .parse()
        .map_err(|e| ConnectorError::Connection(format!("Invalid endpoint '{}': {}", url, e)))?;

    let mut config = Config::new(uri);
    config.connect_timeout = Some(settings.timeout());
    config.read_timeout = Some(settings.timeout());

    if settings.has_credentials() {
        config.auth_info = basic_auth(&settings.username, &settings.password)?;
    }

    Ok(config)
}

fn basic_auth(username: &str, password: &str) -> ConnectorResult<AuthInfo> {
    serde_json::from_value(serde_json::json!({
        "username": username,
        "password": password,
    }))
    .map_err(|e| ConnectorError::Connection(format!("Invalid credentials: {}", e)))
}
