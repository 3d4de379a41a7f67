use crate::config::ClientConfig;
use crate::transport::{api_error, http::auth_headers, TransportError};
use crate::Result;
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::{Method, Proxy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Blocking counterpart of [`super::HttpTransport`], backed by `reqwest::blocking`.
///
/// Must not be constructed or dropped from inside an async runtime.
pub struct BlockingHttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    upload_timeout: Duration,
}

impl BlockingHttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .default_headers(auth_headers(&config.api_key)?)
            .user_agent(super::USER_AGENT);

        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            upload_timeout: config.upload_timeout,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(api_error(status.as_u16(), &body))
    }

    fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .bytes()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(self.request(Method::GET, path).query(query))?;
        Self::read_json(response)
    }

    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body))?;
        Self::read_json(response)
    }

    pub fn post_bytes<T: DeserializeOwned>(&self, path: &str, body: Vec<u8>) -> Result<T> {
        let response = self.send(
            self.request(Method::POST, path)
                .header("content-type", "application/octet-stream")
                .timeout(self.upload_timeout)
                .body(body),
        )?;
        Self::read_json(response)
    }

    pub fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::DELETE, path))?;
        Self::read_json(response)
    }
}
