//! Extension to content type lookup for served assets

use std::path::Path;

/// Content type for files with no known extension
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type of the index entry point
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Look up the content type for a path by its (case-insensitive) extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => HTML_CONTENT_TYPE,
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") => "image/jpg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        Some("woff") => "application/font-woff",
        Some("ttf") => "application/font-ttf",
        Some("eot") => "application/vnd.ms-fontobject",
        Some("otf") => "application/font-otf",
        Some("wasm") => "application/wasm",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(Path::new("assets/app.js")), "text/javascript");
        assert_eq!(content_type_for(Path::new("cover.JPG")), "image/jpg");
        assert_eq!(content_type_for(Path::new("font.woff")), "application/font-woff");
        assert_eq!(content_type_for(Path::new("engine.wasm")), "application/wasm");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for(Path::new("archive.tar.zst")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("LICENSE")), DEFAULT_CONTENT_TYPE);
    }
}
