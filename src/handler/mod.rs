//! Request handler module
//!
//! Maps request paths onto the root directory and serves files, index pages
//! and directory listings.

pub mod error;
pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use error::ServeError;
pub use router::handle_request;
