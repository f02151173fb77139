//! coi-serve - static file server for cross-origin isolated pages
//!
//! Serves a directory over HTTP/1.1, adding the Cross-Origin-Opener-Policy,
//! Cross-Origin-Embedder-Policy and Cross-Origin-Resource-Policy headers that
//! browsers require for `SharedArrayBuffer` and wasm threads, and sending
//! `Cache-Control: no-store` so rebuilt assets are always fetched fresh.

pub mod cli;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
