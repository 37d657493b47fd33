//! Request path to asset resolution with single-page-app fallback

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::http::Response;
use super::mime::{content_type_for, HTML_CONTENT_TYPE};

/// Asset root plus the entry point served for `/` and unknown paths
#[derive(Debug, Clone)]
pub struct AssetRoot {
    root: PathBuf,
    index_file: String,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Map a request target onto a file path under the root
    ///
    /// Query strings and fragments are dropped. Returns `None` when the
    /// path would leave the root; callers treat that like a missing file.
    pub fn file_path(&self, target: &str) -> Option<PathBuf> {
        let path = target.split(['?', '#']).next().unwrap_or_default();
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            return Some(self.root.join(&self.index_file));
        }

        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Produce the response for a request target
    pub async fn respond(&self, target: &str) -> Response {
        let Some(path) = self.file_path(target) else {
            debug!("Rejected path outside asset root: {}", target);
            return self.index_fallback().await;
        };

        match tokio::fs::read(&path).await {
            Ok(content) => Response::ok(content_type_for(&path), content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No asset at {}, serving index", path.display());
                self.index_fallback().await
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Response::server_error(format!("Server Error: {}", error_code(&e)))
            }
        }
    }

    async fn index_fallback(&self) -> Response {
        let index = self.root.join(&self.index_file);
        match tokio::fs::read(&index).await {
            Ok(content) => Response::ok(HTML_CONTENT_TYPE, content),
            Err(e) => {
                warn!("Failed to read index {}: {}", index.display(), e);
                Response::server_error("Server Error")
            }
        }
    }
}

/// Short POSIX-style code for an I/O error, as reported in 500 bodies
pub fn error_code(err: &std::io::Error) -> String {
    let code = match err.kind() {
        ErrorKind::NotFound => "ENOENT",
        ErrorKind::PermissionDenied => "EACCES",
        ErrorKind::IsADirectory => "EISDIR",
        ErrorKind::NotADirectory => "ENOTDIR",
        ErrorKind::Interrupted => "EINTR",
        ErrorKind::OutOfMemory => "ENOMEM",
        _ => {
            return match err.raw_os_error() {
                Some(errno) => format!("ERRNO{}", errno),
                None => "EIO".to_string(),
            }
        }
    };
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> (tempfile::TempDir, AssetRoot) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<!doctype html><main></main>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets").join("app.js"), "console.log(1)").unwrap();
        std::fs::write(dir.path().join("assets").join("blob.xyz"), [0u8, 1, 2]).unwrap();
        let root = AssetRoot::new(dir.path(), "index.html");
        (dir, root)
    }

    #[test]
    fn test_file_path_mapping() {
        let root = AssetRoot::new("/srv/dist", "index.html");
        assert_eq!(root.file_path("/"), Some(PathBuf::from("/srv/dist/index.html")));
        assert_eq!(
            root.file_path("/assets/app.js?v=3"),
            Some(PathBuf::from("/srv/dist/assets/app.js"))
        );
        assert_eq!(root.file_path("/../etc/passwd"), None);
        assert_eq!(root.file_path("/assets/../../secret"), None);
    }

    #[tokio::test]
    async fn test_serves_existing_file_with_content_type() {
        let (_dir, root) = site();
        let response = root.respond("/assets/app.js").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, Some("text/javascript"));
        assert_eq!(response.body, b"console.log(1)");
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let (_dir, root) = site();
        let response = root.respond("/assets/blob.xyz").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, Some("application/octet-stream"));
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_index() {
        let (_dir, root) = site();
        let response = root.respond("/shows/2024").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, Some("text/html"));
        assert!(response.body.starts_with(b"<!doctype html>"));
    }

    #[tokio::test]
    async fn test_escape_attempt_serves_index() {
        let (_dir, root) = site();
        let response = root.respond("/../../etc/passwd").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, Some("text/html"));
    }

    #[tokio::test]
    async fn test_missing_index_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = AssetRoot::new(dir.path(), "index.html");
        let response = root.respond("/nothing-here").await;
        assert_eq!(response.status, 500);
        assert_eq!(response.body, b"Server Error");
    }

    #[tokio::test]
    async fn test_directory_read_reports_code() {
        let (_dir, root) = site();
        let response = root.respond("/assets").await;
        assert_eq!(response.status, 500);
        assert_eq!(response.body, b"Server Error: EISDIR");
    }
}
