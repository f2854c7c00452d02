//! Elasticsearch connection configuration.

use std::{env, time::Duration};

/// Connection settings for an Elasticsearch-compatible cluster.
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    /// Cluster URL.
    pub url: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Whether to verify TLS certificates.
    pub verify_certs: bool,
}

impl ElasticConfig {
    /// Creates a new configuration for a single cluster URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            verify_certs: true,
        }
    }

    /// Creates a configuration from a host, port, and scheme.
    pub fn from_parts(host: &str, port: u16, scheme: &str) -> Self {
        Self::new(format!("{scheme}://{host}:{port}"))
    }

    /// Reads the configuration from the environment.
    ///
    /// `SEARCH_STORE_URL` takes precedence; otherwise the `ELASTIC` variable
    /// is treated as a host name reachable over plain http on port 9200.
    pub fn from_env() -> Self {
        match env::var("SEARCH_STORE_URL") {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::from_parts(&env::var("ELASTIC").unwrap_or_default(), 9200, "http"),
        }
    }

    /// Sets basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enables or disables TLS certificate verification.
    pub fn with_verify_certs(mut self, verify: bool) -> Self {
        self.verify_certs = verify;
        self
    }
}
