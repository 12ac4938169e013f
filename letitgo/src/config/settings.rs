//! Process settings read from the environment.

use std::env;

use letitgo_pipeline::NodeIdPolicy;
use tracing::info;

use crate::config::LogFormat;
use crate::IndexingError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

const DEFAULT_APP_NAME: &str = "Letitgo";
const DEFAULT_ROOT_URL: &str = "http://localhost:9000/";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: &str = "9000";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub app_name: String,
    /// Public URL of the server, always ending in `/`.
    pub root_url: String,
    pub http_addr: String,
    pub http_port: String,
    /// Disables per-request logging in the HTTP server.
    pub disable_router_log: bool,
    pub opensearch_url: String,
    pub node_id_policy: NodeIdPolicy,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `APP_NAME`: Application name (default: Letitgo)
    /// - `ROOT_URL`: Public server URL (default: http://localhost:9000/)
    /// - `HTTP_ADDR`, `HTTP_PORT`: Server binding (default: 0.0.0.0, 9000)
    /// - `DISABLE_ROUTER_LOG`: Disable request logging (default: false)
    /// - `NODE_ID_POLICY`: `random` or `deterministic` (default: random)
    /// - `LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let mut root_url = get_or("ROOT_URL", DEFAULT_ROOT_URL);
        if !root_url.ends_with('/') {
            root_url.push('/');
        }

        let disable_router_log = match get("DISABLE_ROUTER_LOG") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                IndexingError::config(format!("DISABLE_ROUTER_LOG is not a boolean: {}", value))
            })?,
            None => false,
        };

        let node_id_policy = match get("NODE_ID_POLICY") {
            Some(value) => value.parse()?,
            None => NodeIdPolicy::default(),
        };

        let log_format = match get("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            app_name: get_or("APP_NAME", DEFAULT_APP_NAME),
            root_url,
            http_addr: get_or("HTTP_ADDR", DEFAULT_HTTP_ADDR),
            http_port: get_or("HTTP_PORT", DEFAULT_HTTP_PORT),
            disable_router_log,
            opensearch_url: get_or("OPENSEARCH_URL", DEFAULT_OPENSEARCH_URL),
            node_id_policy,
            log_format,
        })
    }

    /// Replace the configured port, including its first occurrence in `root_url`.
    pub fn override_port(&mut self, port: impl Into<String>) {
        let port = port.into();
        self.root_url = self.root_url.replacen(&self.http_port, &port, 1);
        self.http_port = port;
    }

    /// Address the HTTP server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http_addr, self.http_port)
    }

    pub fn log_settings(&self) {
        info!(
            app_name = %self.app_name,
            root_url = %self.root_url,
            listen_addr = %self.listen_addr(),
            opensearch_url = %self.opensearch_url,
            node_id_policy = %self.node_id_policy,
            "Loaded settings"
        );
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
