// Application state module
// Immutable state shared by every connection task

use std::io;
use std::path::PathBuf;

use super::types::Config;
use crate::http::mime::MimeTable;
use crate::logger::AccessLogFormat;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Absolute root directory; never canonicalized here so a missing root
    /// only fails the requests that touch it
    pub root: PathBuf,
    pub mime: MimeTable,
    pub access_log_format: AccessLogFormat,
}

impl AppState {
    pub fn new(config: Config) -> io::Result<Self> {
        let root = std::path::absolute(&config.server.root)?;
        let mime = MimeTable::with_defaults().with_overrides(&config.http.mime_types);
        let access_log_format = config
            .logging
            .access_log_format
            .parse()
            .unwrap_or_default();

        Ok(Self {
            config,
            root,
            mime,
            access_log_format,
        })
    }
}
