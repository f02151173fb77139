//! MIME type table
//!
//! Maps file extensions to Content-Type values. The table is built once at
//! startup and shared read-only with every request.

use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Built-in extension table
const BUILTIN_TYPES: &[(&str, &str)] = &[
    // Text
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/markdown; charset=utf-8"),
    ("csv", "text/csv; charset=utf-8"),
    ("xml", "application/xml"),
    // Scripts and data
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("ts", "application/typescript"),
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    // Audio and video
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("ogg", "audio/ogg"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    // Archives and documents
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
];

/// Extension to Content-Type mapping
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<String, String>,
}

impl MimeTable {
    /// Built-in types plus the `.wasm` mapping browsers require for
    /// streaming compilation
    pub fn with_defaults() -> Self {
        let mut types: HashMap<String, String> = BUILTIN_TYPES
            .iter()
            .map(|(ext, ct)| ((*ext).to_string(), (*ct).to_string()))
            .collect();
        types.insert("wasm".to_string(), "application/wasm".to_string());
        Self { types }
    }

    /// Layer extra mappings over the table. Keys may carry a leading dot.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (ext, content_type) in overrides {
            let ext = ext.trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() {
                self.types.insert(ext, content_type.clone());
            }
        }
        self
    }

    /// Content-Type for an extension, case-insensitive
    pub fn get(&self, extension: Option<&str>) -> &str {
        extension
            .and_then(|ext| {
                self.types
                    .get(ext)
                    .or_else(|| self.types.get(&ext.to_ascii_lowercase()))
            })
            .map_or(DEFAULT_CONTENT_TYPE, String::as_str)
    }

    /// Content-Type for a file path
    pub fn for_path(&self, path: &Path) -> &str {
        self.get(path.extension().and_then(|e| e.to_str()))
    }
}
