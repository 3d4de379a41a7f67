//! Real-time transcription client.

use super::messages::{
    ConfigureEndUtteranceSilenceThreshold, ForceEndUtterance, RealtimeMessage, RealtimeOutbound,
    TerminateSession,
};
use crate::tagged::Tagged;
use crate::transport::{HttpTransport, TransportError};
use crate::{Error, ErrorContext, Result};
use base64::Engine;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Audio encodings accepted by the real-time endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioEncoding {
    /// PCM signed 16-bit little-endian
    #[default]
    PcmS16le,
    /// PCM mu-law (telephony)
    PcmMulaw,
}

impl AudioEncoding {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PcmS16le => "pcm_s16le",
            Self::PcmMulaw => "pcm_mulaw",
        }
    }
}

/// Session parameters sent as query parameters on connect.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    pub sample_rate: u32,
    pub encoding: Option<AudioEncoding>,
    pub word_boost: Vec<String>,
    pub end_utterance_silence_threshold: Option<u32>,
    pub disable_partial_transcripts: bool,
    /// Temporary token from [`RealtimeClient::create_temporary_token`]. When
    /// unset the API key is sent in the `Authorization` header.
    pub token: Option<String>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            encoding: None,
            word_boost: Vec::new(),
            end_utterance_silence_threshold: None,
            disable_partial_transcripts: false,
            token: None,
        }
    }
}

impl RealtimeConfig {
    pub(crate) fn session_url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/v2/realtime/ws", base_url.trim_end_matches('/')))
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid realtime URL: {e}"),
                    ErrorContext::new()
                        .with_field_path("realtime_url")
                        .with_source("realtime"),
                )
            })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("sample_rate", &self.sample_rate.to_string());
            if let Some(encoding) = self.encoding {
                query.append_pair("encoding", encoding.as_str());
            }
            if !self.word_boost.is_empty() {
                query.append_pair("word_boost", &serde_json::to_string(&self.word_boost)?);
            }
            if let Some(threshold) = self.end_utterance_silence_threshold {
                query.append_pair("end_utterance_silence_threshold", &threshold.to_string());
            }
            if self.disable_partial_transcripts {
                query.append_pair("disable_partial_transcripts", "true");
            }
            if let Some(token) = &self.token {
                query.append_pair("token", token);
            }
        }
        Ok(url)
    }
}

#[derive(Serialize)]
struct TemporaryTokenRequest {
    expires_in: u32,
}

#[derive(Deserialize)]
struct TemporaryTokenResponse {
    token: String,
}

/// Entry point for real-time sessions.
#[derive(Clone)]
pub struct RealtimeClient {
    transport: Arc<HttpTransport>,
    realtime_url: String,
}

impl RealtimeClient {
    pub(crate) fn new(transport: Arc<HttpTransport>, realtime_url: String) -> Self {
        Self {
            transport,
            realtime_url,
        }
    }

    /// Mint a short-lived token so browsers and devices can connect without the API key.
    pub async fn create_temporary_token(&self, expires_in_secs: u32) -> Result<String> {
        let response: TemporaryTokenResponse = self
            .transport
            .post_json(
                "/v2/realtime/token",
                &TemporaryTokenRequest {
                    expires_in: expires_in_secs,
                },
            )
            .await?;
        Ok(response.token)
    }

    pub async fn connect(&self, config: &RealtimeConfig) -> Result<RealtimeSession> {
        let api_key = match config.token {
            Some(_) => None,
            None => Some(self.transport.api_key()),
        };
        RealtimeSession::connect(&self.realtime_url, api_key, config).await
    }
}

/// An open real-time session.
///
/// Reads and writes are driven by the caller: call [`RealtimeSession::recv`]
/// to receive the next message and the `send_*` methods to stream audio.
pub struct RealtimeSession {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    session_id: Option<String>,
    /// Set on `SessionTerminated` or a server close; no terminate request is sent after that.
    terminated: bool,
}

impl RealtimeSession {
    pub(crate) async fn connect(
        base_url: &str,
        api_key: Option<&str>,
        config: &RealtimeConfig,
    ) -> Result<Self> {
        let url = config.session_url(base_url)?;
        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(TransportError::from)?;
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                Error::configuration_with_context(
                    "API key contains characters that are not valid in a header",
                    ErrorContext::new()
                        .with_field_path("api_key")
                        .with_source("realtime"),
                )
            })?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (ws_stream, _response) = connect_async(request)
            .await
            .map_err(TransportError::from)?;
        info!(sample_rate = config.sample_rate, "connected to real-time transcription");

        let (sink, stream) = ws_stream.split();
        Ok(Self {
            sink,
            stream,
            session_id: None,
            terminated: false,
        })
    }

    /// Set once `SessionBegins` has been received.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Next message from the server, or `None` once the socket is closed.
    pub async fn recv(&mut self) -> Result<Option<RealtimeMessage>> {
        while let Some(frame) = self.stream.next().await {
            match frame.map_err(TransportError::from)? {
                Message::Text(text) => {
                    let message = RealtimeMessage::from_json_str(text.as_str())?;
                    match &message {
                        RealtimeMessage::SessionBegins(begins) => {
                            info!(session_id = %begins.session_id, expires_at = %begins.expires_at, "session began");
                            self.session_id = Some(begins.session_id.clone());
                        }
                        RealtimeMessage::SessionTerminated(_) => {
                            debug!(session_id = ?self.session_id, "session terminated");
                            self.terminated = true;
                        }
                        RealtimeMessage::Error(err) => {
                            warn!(error = %err.error, "real-time error");
                        }
                        RealtimeMessage::Unknown(raw) => {
                            warn!(%raw, "unrecognised real-time message");
                        }
                        _ => {}
                    }
                    return Ok(Some(message));
                }
                Message::Close(frame) => {
                    debug!(?frame, "real-time socket closed by server");
                    // Sends the close reply tungstenite queued.
                    let _ = self.sink.flush().await;
                    self.terminated = true;
                    return Ok(None);
                }
                _ => continue,
            }
        }
        Ok(None)
    }

    pub async fn send(&mut self, message: &RealtimeOutbound) -> Result<()> {
        let frame = message.to_wire()?;
        self.sink
            .send(Message::Text(frame.into()))
            .await
            .map_err(TransportError::from)?;
        Ok(())
    }

    /// Send raw audio in the session's encoding.
    pub async fn send_audio(&mut self, audio: &[u8]) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(audio);
        self.send(&RealtimeOutbound::AudioData(encoded)).await
    }

    pub async fn force_end_utterance(&mut self) -> Result<()> {
        self.send(&RealtimeOutbound::ForceEndUtterance(
            ForceEndUtterance::default(),
        ))
        .await
    }

    pub async fn configure_end_utterance_silence_threshold(&mut self, millis: u32) -> Result<()> {
        self.send(&RealtimeOutbound::ConfigureEndUtteranceSilenceThreshold(
            ConfigureEndUtteranceSilenceThreshold {
                end_utterance_silence_threshold: millis,
            },
        ))
        .await
    }

    /// Ask the server to terminate, collect the remaining messages up to and
    /// including `SessionTerminated`, then close the socket.
    pub async fn close(mut self) -> Result<Vec<RealtimeMessage>> {
        let mut remaining = Vec::new();
        if !self.terminated {
            self.send(&RealtimeOutbound::TerminateSession(TerminateSession::default()))
                .await?;
            while let Some(message) = self.recv().await? {
                let done = message.is_termination();
                remaining.push(message);
                if done {
                    break;
                }
            }
        }
        let _ = self.sink.send(Message::Close(None)).await;
        let _ = self.sink.close().await;
        Ok(remaining)
    }
}
