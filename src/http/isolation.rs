//! Cross-origin isolation headers
//!
//! Every response leaves the server through [`finalize_response`], which
//! appends the headers browsers require before enabling `SharedArrayBuffer`
//! and wasm threads, and turns caching off.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::Response;

/// Fixed header set, in the order it is appended
pub const ISOLATION_HEADERS: [(&str, &str); 4] = [
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("cross-origin-resource-policy", "same-origin"),
    ("cache-control", "no-store"),
];

/// Insert the fixed header set, replacing any value already present
pub fn apply_isolation_headers(headers: &mut HeaderMap) {
    for (name, value) in ISOLATION_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// Response finalization step wrapped around every handler
pub fn finalize_response<B>(mut response: Response<B>) -> Response<B> {
    apply_isolation_headers(response.headers_mut());
    response
}
