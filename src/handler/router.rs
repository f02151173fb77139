//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, error mapping and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw, still percent-encoded path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling.
///
/// The request body is dropped unread, so any body type is accepted. Isolation
/// headers are added afterwards by the connection's finalization step.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let mut response = match check_http_method(&parts.method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: parts.uri.path(),
                query: parts.uri.query(),
                is_head: parts.method == Method::HEAD,
            };
            match static_files::serve_path(&ctx, &state).await {
                Ok(resp) => resp,
                Err(e) => {
                    logger::log_debug(&format!("{} {} -> {e}", parts.method, ctx.path));
                    http::build_error_response(e.status(), e.message())
                }
            }
        }
    };

    http::response::set_server_name(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        log_access(&parts, &response, &state, peer_addr, started);
    }

    Ok(response)
}

/// Return early response for methods other than GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn log_access(
    req: &Parts,
    response: &Response<ResponseBody>,
    state: &AppState,
    peer_addr: SocketAddr,
    started: Instant,
) {
    let header = |name: HeaderName| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = version_label(req.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, state.access_log_format);
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
