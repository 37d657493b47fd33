//! Asset responses and their conversion to `tiny_http` responses

use std::io::Cursor;

use tiny_http::{Header, StatusCode};

/// Methods the asset server answers; anything else gets a 405
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// Response produced by the asset layer, independent of the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type),
            body,
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            status: 500,
            content_type: None,
            body: message.into().into_bytes(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status: 405,
            content_type: None,
            body: b"Method Not Allowed".to_vec(),
        }
    }

    /// Build the wire response. HEAD bodies are dropped by `tiny_http` itself.
    pub fn into_http(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let mut response =
            tiny_http::Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Some(content_type) = self.content_type {
            if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
                response.add_header(header);
            }
        }
        if self.status == 405 {
            if let Ok(header) = Header::from_bytes(&b"Allow"[..], ALLOWED_METHODS.as_bytes()) {
                response.add_header(header);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(
        response: &'a tiny_http::Response<Cursor<Vec<u8>>>,
        name: &'static str,
    ) -> Option<&'a str> {
        response
            .headers()
            .iter()
            .find(|h| h.field.equiv(name))
            .map(|h| h.value.as_str())
    }

    #[test]
    fn test_ok_carries_content_type() {
        let response = Response::ok("text/css", b"body{}".to_vec()).into_http();
        assert_eq!(response.status_code(), StatusCode(200));
        assert_eq!(header(&response, "Content-Type"), Some("text/css"));
        assert_eq!(response.data_length(), Some(6));
    }

    #[test]
    fn test_method_not_allowed_lists_allowed_methods() {
        let response = Response::method_not_allowed().into_http();
        assert_eq!(response.status_code(), StatusCode(405));
        assert_eq!(header(&response, "Allow"), Some(ALLOWED_METHODS));
        assert_eq!(header(&response, "Content-Type"), None);
    }
}
