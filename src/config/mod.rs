// Configuration module entry point
// Layers defaults, config file, environment and command line into one Config

mod state;
mod types;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

use crate::cli::CliArgs;
use crate::logger::{AccessLogFormat, Level};
use std::net::{SocketAddr, ToSocketAddrs};

/// Looked up without extension, so any format the config crate reads works
const DEFAULT_CONFIG_FILE: &str = "coi-serve";

impl Config {
    /// Load configuration.
    ///
    /// Precedence, highest first: command line (and `PORT` for the port),
    /// `COI_SERVE_*` environment variables, config file, built-in defaults.
    pub fn load(args: &CliArgs) -> Result<Self, config::ConfigError> {
        let launch_dir = std::env::current_dir().map_err(|e| {
            config::ConfigError::Message(format!("Cannot determine current directory: {e}"))
        })?;

        let file = match args.config.as_deref() {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("COI_SERVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.root", launch_dir.to_string_lossy().into_owned())?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.backlog", 128)?
            .set_default(
                "http.server_name",
                concat!("coi-serve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_override_option("server.bind", args.bind.clone())?
            .set_override_option("server.port", args.port.map(i64::from))?
            .set_override_option(
                "server.root",
                args.dir
                    .as_ref()
                    .map(|dir| dir.to_string_lossy().into_owned()),
            )?
            .build()?;

        settings.try_deserialize()
    }

    /// Reject configurations that cannot start a server
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Invalid port 0: an explicit listen port is required".to_string());
        }
        if self.performance.backlog == 0 {
            return Err("performance.backlog must be greater than 0".to_string());
        }
        self.logging.level.parse::<Level>()?;
        self.logging.access_log_format.parse::<AccessLogFormat>()?;
        self.get_socket_addr()?;
        Ok(())
    }

    /// Resolve `server.bind` and `server.port` into a socket address.
    ///
    /// Accepts IPv4/IPv6 literals as well as host names.
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let bind = self.server.bind.as_str();
        (bind, self.server.port)
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address '{bind}': {e}"))?
            .next()
            .ok_or_else(|| format!("Address '{bind}' did not resolve"))
    }
}
