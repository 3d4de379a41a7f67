use crate::config::ClientConfig;
use crate::transport::{api_error, TransportError};
use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, Proxy, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Async HTTP transport shared by every resource client.
///
/// Cheap to share behind an `Arc`; reqwest pools connections internally, so
/// concurrent waiters polling different transcripts can use one transport.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    upload_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(auth_headers(&config.api_key)?)
            .user_agent(super::USER_AGENT)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

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
            api_key: config.api_key.clone(),
            upload_timeout: config.upload_timeout,
        })
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(api_error(status.as_u16(), &body))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        Self::read_json(response).await
    }

    pub async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        response
            .text()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        Self::read_json(response).await
    }

    /// POST a raw octet-stream body under the upload timeout instead of the
    /// per-request one.
    pub async fn post_body<T: DeserializeOwned>(
        &self,
        path: &str,
        body: reqwest::Body,
    ) -> Result<T> {
        let response = self
            .send(
                self.request(Method::POST, path)
                    .header("content-type", "application/octet-stream")
                    .timeout(self.upload_timeout)
                    .body(body),
            )
            .await?;
        Self::read_json(response).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        Self::read_json(response).await
    }
}

pub(crate) fn auth_headers(api_key: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(api_key).map_err(|_| {
        crate::Error::configuration_with_context(
            "API key contains characters that are not valid in a header",
            crate::ErrorContext::new()
                .with_field_path("api_key")
                .with_source("transport"),
        )
    })?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
