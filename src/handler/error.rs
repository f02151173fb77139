//! Per-request error type

use hyper::StatusCode;
use std::fmt;
use std::io;

/// Reasons a request cannot be served. Each maps to one status code and is
/// turned into a response inside the connection task.
#[derive(Debug)]
pub enum ServeError {
    /// Path is not valid percent-encoded UTF-8
    BadRequest,
    /// Path escapes the root, by `..` segments or through a symlink
    Forbidden,
    NotFound,
    /// The root directory itself cannot be resolved
    RootUnavailable(io::Error),
    /// Permission or read failure on an existing path
    Io(io::Error),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RootUnavailable(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown in the error page
    pub const fn message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request path",
            Self::Forbidden => "Path is outside the served directory",
            Self::NotFound => "File not found",
            Self::RootUnavailable(_) => "Served directory is unavailable",
            Self::Io(_) => "Unable to read file",
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::InvalidInput => {
                Self::NotFound
            }
            _ => Self::Io(err),
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootUnavailable(e) => write!(f, "{}: {e}", self.message()),
            Self::Io(e) => write!(f, "{}: {e}", self.message()),
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for ServeError {}
