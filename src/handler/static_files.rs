//! Static file serving module
//!
//! Resolves a request against the root directory and serves the file, the
//! directory's index file, or a generated listing.

use super::error::ServeError;
use super::listing;
use super::resolve::{confine, resolve_request_path};
use super::router::RequestContext;
use crate::config::AppState;
use crate::http::{self, FileBody, ResponseBody};
use crate::logger;
use chrono::{DateTime, Utc};
use hyper::Response;
use std::fs::Metadata;
use std::path::Path;
use tokio::fs;

/// Index files tried, in order, for directory requests
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serve the path named by the request
pub async fn serve_path(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<ResponseBody>, ServeError> {
    let candidate = resolve_request_path(&state.root, ctx.path).map_err(|e| {
        if matches!(e, ServeError::Forbidden) {
            logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
        }
        e
    })?;
    let path = confine(&state.root, &candidate).await.map_err(|e| {
        match &e {
            ServeError::Forbidden => logger::log_warning(&format!(
                "Path escapes root through a symlink: {}",
                ctx.path
            )),
            ServeError::RootUnavailable(err) => logger::log_error(&format!(
                "Root directory '{}' is unavailable: {err}",
                state.root.display()
            )),
            _ => {}
        }
        e
    })?;
    let metadata = fs::metadata(&path).await?;

    if !metadata.is_dir() {
        // A trailing slash names a directory
        if ctx.path.ends_with('/') {
            return Err(ServeError::NotFound);
        }
        return serve_file(ctx, state, &candidate, &path, &metadata).await;
    }

    if !ctx.path.ends_with('/') {
        return Ok(http::build_redirect_response(&directory_location(
            ctx.path, ctx.query,
        )));
    }

    for index in INDEX_FILES {
        let index_candidate = candidate.join(index);
        let Ok(index_path) = confine(&state.root, &index_candidate).await else {
            continue;
        };
        if let Ok(index_meta) = fs::metadata(&index_path).await {
            if index_meta.is_file() {
                return serve_file(ctx, state, &index_candidate, &index_path, &index_meta).await;
            }
        }
    }

    serve_listing(ctx, &path).await
}

/// Serve a regular file. `requested` names the file as the client asked for
/// it and decides the content type; `path` is the confined path opened.
async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    requested: &Path,
    path: &Path,
    metadata: &Metadata,
) -> Result<Response<ResponseBody>, ServeError> {
    let content_type = state.mime.for_path(requested);
    let len = metadata.len();
    let last_modified = metadata.modified().ok().map(http_date);

    // Open even for HEAD so unreadable files fail the same way for both methods
    let file = fs::File::open(path).await.map_err(|e| {
        logger::log_error(&format!("Failed to open file '{}': {e}", path.display()));
        ServeError::from(e)
    })?;

    let body = if ctx.is_head {
        http::body::empty()
    } else {
        FileBody::new(file, len).boxed()
    };

    Ok(http::build_file_response(
        body,
        content_type,
        len,
        last_modified.as_deref(),
    ))
}

async fn serve_listing(
    ctx: &RequestContext<'_>,
    dir: &Path,
) -> Result<Response<ResponseBody>, ServeError> {
    let entries = listing::read_entries(dir).await.map_err(|e| {
        logger::log_error(&format!("Failed to list directory '{}': {e}", dir.display()));
        ServeError::Io(e)
    })?;

    let display_path = urlencoding::decode(ctx.path).map_or_else(|_| ctx.path.into(), |p| p);
    let page = listing::render_listing(&display_path, &entries);
    Ok(http::build_html_response(page, ctx.is_head))
}

/// Redirect target for a directory requested without its trailing slash.
///
/// Leading slashes collapse to one so `//host` never becomes a
/// protocol-relative `Location`.
fn directory_location(path: &str, query: Option<&str>) -> String {
    let path = path.trim_start_matches('/');
    match query {
        Some(q) => format!("/{path}/?{q}"),
        None => format!("/{path}/"),
    }
}

/// Format a timestamp as an RFC 7231 HTTP-date
fn http_date(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
