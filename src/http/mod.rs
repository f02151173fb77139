//! HTTP protocol layer module
//!
//! Response bodies, builders, the MIME table and the isolation header step,
//! kept apart from path resolution and filesystem access.

pub mod body;
pub mod isolation;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::{FileBody, ResponseBody};
pub use isolation::{apply_isolation_headers, finalize_response, ISOLATION_HEADERS};
pub use mime::MimeTable;
pub use response::{
    build_405_response, build_error_response, build_file_response, build_html_response,
    build_options_response, build_redirect_response,
};
