//! Resolved client configuration.
//!
//! Values come from [`crate::ClientBuilder`] setters first and fall back to the
//! environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ASSEMBLYAI_API_KEY` | required |
//! | `ASSEMBLYAI_BASE_URL` | `https://api.assemblyai.com` |
//! | `ASSEMBLYAI_REALTIME_URL` | `wss://api.assemblyai.com` |
//! | `ASSEMBLYAI_HTTP_TIMEOUT_SECS` | `30` |
//! | `ASSEMBLYAI_UPLOAD_TIMEOUT_SECS` | `3600` |
//! | `ASSEMBLYAI_PROXY_URL` | none |

use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";
pub const DEFAULT_REALTIME_URL: &str = "wss://api.assemblyai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Uploads stream whole audio files, so they get a separate, longer limit.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 3600;

pub const API_KEY_ENV: &str = "ASSEMBLYAI_API_KEY";
pub const BASE_URL_ENV: &str = "ASSEMBLYAI_BASE_URL";
pub const REALTIME_URL_ENV: &str = "ASSEMBLYAI_REALTIME_URL";
pub const TIMEOUT_ENV: &str = "ASSEMBLYAI_HTTP_TIMEOUT_SECS";
pub const UPLOAD_TIMEOUT_ENV: &str = "ASSEMBLYAI_UPLOAD_TIMEOUT_SECS";
pub const PROXY_URL_ENV: &str = "ASSEMBLYAI_PROXY_URL";

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub realtime_url: String,
    /// Total time for one API request, body included.
    pub timeout: Duration,
    /// Total time for one `/v2/upload` request.
    pub upload_timeout: Duration,
    pub proxy_url: Option<String>,
}

// Keep the key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("realtime_url", &self.realtime_url)
            .field("timeout", &self.timeout)
            .field("upload_timeout", &self.upload_timeout)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

impl ClientConfig {
    pub(crate) fn env_api_key() -> Option<String> {
        env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
    }

    pub(crate) fn env_base_url() -> Option<String> {
        env::var(BASE_URL_ENV).ok()
    }

    pub(crate) fn env_realtime_url() -> Option<String> {
        env::var(REALTIME_URL_ENV).ok()
    }

    pub(crate) fn env_timeout() -> Option<Duration> {
        env_secs(TIMEOUT_ENV)
    }

    pub(crate) fn env_upload_timeout() -> Option<Duration> {
        env_secs(UPLOAD_TIMEOUT_ENV)
    }

    pub(crate) fn env_proxy_url() -> Option<String> {
        env::var(PROXY_URL_ENV).ok()
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
