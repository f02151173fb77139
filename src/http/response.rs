//! HTTP response building module
//!
//! Builders for the responses the file server produces. Cache and isolation
//! headers are not set here; they are applied by
//! [`finalize_response`](super::isolation::finalize_response).

use super::body::{self, ResponseBody};
use hyper::header::{HeaderValue, ALLOW, SERVER};
use hyper::{Response, StatusCode};

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build an HTML error page naming the status code and message
pub fn build_error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    let page = error_page(status, message);

    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", page.len())
        .body(body::full(page))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback_response(status)
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let mut response = build_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", ALLOWED_METHODS)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            fallback_response(StatusCode::NO_CONTENT)
        })
}

/// Build 301 redirect, used to add the trailing slash to directory paths
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target")
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            fallback_response(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build 200 response for a file body
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
    last_modified: Option<&str>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        fallback_response(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Set the `Server` header, ignoring names that are not valid header values
pub fn set_server_name<B>(response: &mut Response<B>, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        response.headers_mut().insert(SERVER, value);
    }
}

fn error_page(status: StatusCode, message: &str) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let message = html_escape(message);
    format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Error response</title>\n\
         </head>\n\
         <body>\n\
         <h1>Error response</h1>\n\
         <p>Error code: {code}</p>\n\
         <p>Message: {message}.</p>\n\
         <p>Error code explanation: {code} - {reason}.</p>\n\
         </body>\n\
         </html>\n"
    )
}

/// Escape text for inclusion in HTML
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn fallback_response(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(body::empty());
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
