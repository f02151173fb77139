//! Generated directory listings

use crate::http::response::html_escape;
use std::io;
use std::path::Path;
use tokio::fs;

/// One directory entry as shown in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Name shown to the user: directories end in `/`, symlinks in `@`
    fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else if self.is_symlink {
            format!("{}@", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Percent-encoded link target relative to the listed directory
    fn href(&self) -> String {
        let encoded = urlencoding::encode(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        }
    }
}

/// Read directory entries sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let file_type = entry.file_type().await?;
        // Symlinked directories are listed as directories, like their targets
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the HTML listing page for `display_path`
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", html_escape(display_path));
    let mut page = String::with_capacity(256 + entries.len() * 64);

    page.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{title}</title>\n"));
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        page.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            html_escape(&entry.href()),
            html_escape(&entry.display_name()),
        ));
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_listing() {
        let page = render_listing(
            "/pkg/",
            &[
                entry("app.wasm", false, false),
                entry("assets", true, false),
                entry("latest", false, true),
            ],
        );
        assert!(page.contains("<title>Directory listing for /pkg/</title>"));
        assert!(page.contains("<li><a href=\"app.wasm\">app.wasm</a></li>"));
        assert!(page.contains("<li><a href=\"assets/\">assets/</a></li>"));
        assert!(page.contains("<li><a href=\"latest\">latest@</a></li>"));
    }

    #[test]
    fn test_render_escapes_names() {
        let page = render_listing("/<x>/", &[entry("a b&<c>.txt", false, false)]);
        assert!(page.contains("Directory listing for /&lt;x&gt;/"));
        assert!(page.contains("href=\"a%20b%26%3Cc%3E.txt\""));
        assert!(page.contains(">a b&amp;&lt;c&gt;.txt</a>"));
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("A.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A.txt", "b.txt", "c"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
    }
}
