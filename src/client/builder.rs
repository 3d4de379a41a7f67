use crate::config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_REALTIME_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_UPLOAD_TIMEOUT_SECS,
};
use crate::{Error, ErrorContext, Result};
use std::time::Duration;

/// Builder for [`crate::AssemblyAiClient`] and [`crate::blocking::AssemblyAiClient`].
///
/// Unset values fall back to the environment (see [`crate::config`]).
#[derive(Debug, Default, Clone)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    realtime_url: Option<String>,
    timeout: Option<Duration>,
    upload_timeout: Option<Duration>,
    proxy_url: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the REST base URL (primarily for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn realtime_url(mut self, url: impl Into<String>) -> Self {
        self.realtime_url = Some(url.into());
        self
    }

    /// Per-request HTTP timeout. Does not bound polling; see [`crate::polling::PollingOptions`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Limit for a whole media upload, including streaming the file.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn resolve(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .or_else(ClientConfig::env_api_key)
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required",
                    ErrorContext::new()
                        .with_field_path("api_key")
                        .with_details(format!("set it on the builder or in {}", crate::config::API_KEY_ENV))
                        .with_source("client_builder"),
                )
            })?;
        let base_url = self
            .base_url
            .or_else(ClientConfig::env_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let realtime_url = self
            .realtime_url
            .or_else(ClientConfig::env_realtime_url)
            .unwrap_or_else(|| DEFAULT_REALTIME_URL.to_string());
        let timeout = self
            .timeout
            .or_else(ClientConfig::env_timeout)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "HTTP timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("timeout")
                    .with_source("client_builder"),
            ));
        }
        let upload_timeout = self
            .upload_timeout
            .or_else(ClientConfig::env_upload_timeout)
            .unwrap_or(Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS));
        if upload_timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "upload timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("upload_timeout")
                    .with_source("client_builder"),
            ));
        }
        let proxy_url = self.proxy_url.or_else(ClientConfig::env_proxy_url);

        Ok(ClientConfig {
            api_key,
            base_url,
            realtime_url,
            timeout,
            upload_timeout,
            proxy_url,
        })
    }

    pub fn build(self) -> Result<crate::AssemblyAiClient> {
        crate::AssemblyAiClient::from_config(self.resolve()?)
    }

    pub fn build_blocking(self) -> Result<crate::blocking::AssemblyAiClient> {
        crate::blocking::AssemblyAiClient::from_config(self.resolve()?)
    }
}
