//! Shared helpers: a live server on an ephemeral port and a raw HTTP client

#![allow(dead_code)]

use coi_serve::cli::CliArgs;
use coi_serve::config::{AppState, Config};
use coi_serve::server;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

pub const ISOLATION_HEADERS: [(&str, &str); 4] = [
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("cross-origin-resource-policy", "same-origin"),
    ("cache-control", "no-store"),
];

pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Start a server for `root` on 127.0.0.1 with an OS-assigned port
pub async fn start_server(root: &Path) -> TestServer {
    let args = CliArgs {
        dir: Some(root.to_path_buf()),
        ..CliArgs::default()
    };
    let mut config = Config::load(&args).unwrap();
    config.logging.access_log = false;
    let state = Arc::new(AppState::new(config).unwrap());

    let listener = server::create_listener("127.0.0.1:0".parse().unwrap(), 128).unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        server::run(listener, state, async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });

    TestServer {
        addr,
        shutdown: Some(tx),
    }
}

/// Parsed HTTP response
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// All values of a header, name matched case-insensitively
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).first().copied()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Each isolation header present exactly once with its exact value
    pub fn assert_isolation_headers(&self) {
        for (name, value) in ISOLATION_HEADERS {
            assert_eq!(
                self.header_values(name),
                vec![value],
                "header {name} on {} response",
                self.status
            );
        }
    }
}

/// Parse one response from the front of `raw`, returning it and the rest
pub fn parse_response(raw: &[u8], is_head: bool) -> (RawResponse, &[u8]) {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = std::str::from_utf8(&raw[..split]).unwrap();
    let rest = &raw[split + 4..];

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .map_or(0, |(_, v)| v.parse::<usize>().unwrap());
    let body_len = if is_head || status == 204 || status == 304 {
        0
    } else {
        content_length.min(rest.len())
    };

    let response = RawResponse {
        status,
        headers,
        body: rest[..body_len].to_vec(),
    };
    (response, &rest[body_len..])
}

/// Send raw request bytes and read until the server closes the connection
pub async fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut buf))
        .await
        .expect("server did not close the connection")
        .unwrap();
    buf
}

/// Send one request with `Connection: close` and parse the response
pub async fn request(addr: SocketAddr, method: &str, target: &str) -> RawResponse {
    let raw = format!(
        "{method} {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
    );
    let bytes = send_raw(addr, raw.as_bytes()).await;
    parse_response(&bytes, method == "HEAD").0
}

pub async fn get(addr: SocketAddr, target: &str) -> RawResponse {
    request(addr, "GET", target).await
}

/// Root with `index.html`, `app.wasm` and a `docs/` directory
pub fn create_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>coi</h1>").unwrap();
    std::fs::write(dir.path().join("app.wasm"), b"\0asm\x01\0\0\0").unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/a.txt"), "alpha").unwrap();
    std::fs::write(dir.path().join("docs/b.txt"), "bravo").unwrap();
    dir
}
