// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Listen address and served directory
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Root directory, resolved against the launch directory when relative
    pub root: String,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (common, combined or json)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub backlog: u32,
    #[serde(default)]
    pub max_connections: Option<u64>,
    /// Seconds allowed to receive a request's headers, unset means no limit
    #[serde(default)]
    pub header_read_timeout: Option<u64>,
    /// Whole-connection timeout in seconds, unset means no limit
    #[serde(default)]
    pub connection_timeout: Option<u64>,
}

/// HTTP response configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Extra extension -> content-type mappings layered over the built-in table
    #[serde(default)]
    pub mime_types: HashMap<String, String>,
}
