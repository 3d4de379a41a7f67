//! HTTP transports.
//!
//! Both transports attach the `Authorization` header, send JSON or raw bytes,
//! and turn non-2xx responses into [`crate::Error::Api`]. Retries are left to
//! the caller.

pub mod blocking;
pub mod http;

pub use blocking::BlockingHttpTransport;
pub use http::HttpTransport;

pub(crate) const USER_AGENT: &str = concat!("assemblyai-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("Transport error: {0}")]
    Other(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::WebSocket(Box::new(e))
    }
}

/// Build an [`crate::Error::Api`] from a failed response body.
///
/// The API reports failures as `{"error": "..."}`; anything else is kept verbatim.
pub(crate) fn api_error(status: u16, body: &str) -> crate::Error {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string());
    crate::Error::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_error_field() {
        let err = api_error(401, r#"{"error": "Authentication error, API token missing/invalid"}"#);
        match err {
            crate::Error::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication error, API token missing/invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_keeps_plain_bodies() {
        let err = api_error(502, "  Bad Gateway\n");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().ends_with("Bad Gateway"));
    }
}
