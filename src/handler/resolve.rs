//! Request path to filesystem path resolution
//!
//! Two stages: a lexical pass that decodes the request path and rejects any
//! segment that could leave the root, then a canonical check that follows
//! symlinks and confirms the target still lies under the root.

use super::error::ServeError;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Decode `request_path` and join its segments onto `root`.
///
/// Empty and `.` segments are dropped. `..`, absolute parts and drive
/// prefixes are rejected rather than silently skipped.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Result<PathBuf, ServeError> {
    let decoded = urlencoding::decode(request_path).map_err(|_| ServeError::BadRequest)?;
    let mut resolved = root.to_path_buf();

    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => resolved.push(part),
            _ => return Err(ServeError::Forbidden),
        }
    }

    Ok(resolved)
}

/// Canonicalize `candidate` and require it to stay under `root`.
pub async fn confine(root: &Path, candidate: &Path) -> Result<PathBuf, ServeError> {
    let root = fs::canonicalize(root)
        .await
        .map_err(ServeError::RootUnavailable)?;
    let canonical = fs::canonicalize(candidate).await?;

    if canonical.starts_with(&root) {
        Ok(canonical)
    } else {
        Err(ServeError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str) -> Result<PathBuf, ServeError> {
        resolve_request_path(Path::new("/srv/site"), path)
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(resolve("/").unwrap(), PathBuf::from("/srv/site"));
        assert_eq!(
            resolve("/pkg/app.wasm").unwrap(),
            PathBuf::from("/srv/site/pkg/app.wasm")
        );
        assert_eq!(
            resolve("//pkg/./app.wasm").unwrap(),
            PathBuf::from("/srv/site/pkg/app.wasm")
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            resolve("/my%20file.txt").unwrap(),
            PathBuf::from("/srv/site/my file.txt")
        );
        assert_eq!(
            resolve("/%E6%96%87.txt").unwrap(),
            PathBuf::from("/srv/site/文.txt")
        );
    }

    #[test]
    fn test_parent_segments_rejected() {
        assert!(matches!(resolve("/../etc/passwd"), Err(ServeError::Forbidden)));
        assert!(matches!(
            resolve("/pkg/../../etc/passwd"),
            Err(ServeError::Forbidden)
        ));
        assert!(matches!(
            resolve("/%2e%2e/%2e%2e/etc/passwd"),
            Err(ServeError::Forbidden)
        ));
        assert!(matches!(
            resolve("/..%2F..%2Fetc%2Fpasswd"),
            Err(ServeError::Forbidden)
        ));
    }

    #[test]
    fn test_invalid_encoding() {
        assert!(matches!(resolve("/%FF%FE"), Err(ServeError::BadRequest)));
    }

    #[tokio::test]
    async fn test_confine_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "hi").unwrap();

        let candidate = resolve_request_path(dir.path(), "/index.html").unwrap();
        let confined = confine(dir.path(), &candidate).await.unwrap();
        assert!(confined.ends_with("index.html"));
    }

    #[tokio::test]
    async fn test_confine_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("missing.txt");
        assert!(matches!(
            confine(dir.path(), &candidate).await,
            Err(ServeError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_confine_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gone");
        assert!(matches!(
            confine(&root, &root.join("a.txt")).await,
            Err(ServeError::RootUnavailable(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_confine_rejects_symlink_escape() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("link")).unwrap();

        let candidate = resolve_request_path(root.path(), "/link/secret.txt").unwrap();
        assert!(matches!(
            confine(root.path(), &candidate).await,
            Err(ServeError::Forbidden)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_confine_allows_symlink_within_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("real")).unwrap();
        std::fs::write(root.path().join("real/a.txt"), "a").unwrap();
        std::os::unix::fs::symlink(root.path().join("real"), root.path().join("alias")).unwrap();

        let candidate = resolve_request_path(root.path(), "/alias/a.txt").unwrap();
        assert!(confine(root.path(), &candidate).await.is_ok());
    }
}
