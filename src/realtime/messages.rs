//! WebSocket message types for real-time transcription.
//!
//! - **Inbound** ([`RealtimeMessage`]), tried in this order:
//!   [`SessionBegins`], [`PartialTranscript`], [`FinalTranscript`],
//!   [`SessionTerminated`], [`RealtimeError`].
//! - **Outbound** ([`RealtimeOutbound`]), tried in this order:
//!   [`TerminateSession`], [`ForceEndUtterance`],
//!   [`ConfigureEndUtteranceSilenceThreshold`], base64 audio string.
//!
//! Anything else decodes to the family's `Unknown` variant.

use crate::tagged::{shape, Candidate, Tagged};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// =============================================================================
// Inbound Messages (Server to Client)
// =============================================================================

/// First message of every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBegins {
    /// Always "SessionBegins"
    pub message_type: String,
    pub session_id: String,
    /// ISO 8601 timestamp after which the session is closed by the server
    pub expires_at: String,
}

/// Word timing within a realtime transcript, in milliseconds from stream start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeWord {
    pub start: u64,
    pub end: u64,
    pub confidence: f64,
    pub text: String,
}

/// Interim hypothesis for the utterance in progress; later messages may revise it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialTranscript {
    /// Always "PartialTranscript"
    pub message_type: String,
    pub audio_start: u64,
    pub audio_end: u64,
    pub confidence: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<RealtimeWord>,
    pub created: String,
}

/// Completed utterance. Never revised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalTranscript {
    /// Always "FinalTranscript"
    pub message_type: String,
    pub audio_start: u64,
    pub audio_end: u64,
    pub confidence: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<RealtimeWord>,
    pub created: String,
    pub punctuated: bool,
    pub text_formatted: bool,
}

/// Sent by the server after a terminate request, as the last message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTerminated {
    /// Always "SessionTerminated"
    pub message_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeError {
    pub error: String,
}

/// Any message the server can send.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeMessage {
    SessionBegins(SessionBegins),
    PartialTranscript(PartialTranscript),
    FinalTranscript(FinalTranscript),
    SessionTerminated(SessionTerminated),
    Error(RealtimeError),
    /// Unknown message shape (for forward compatibility)
    Unknown(Value),
}

impl RealtimeMessage {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, RealtimeMessage::Error(_))
    }

    #[inline]
    pub fn is_final_transcript(&self) -> bool {
        matches!(self, RealtimeMessage::FinalTranscript(_))
    }

    #[inline]
    pub fn is_termination(&self) -> bool {
        matches!(self, RealtimeMessage::SessionTerminated(_))
    }

    /// Transcript text for partial and final transcripts.
    pub fn text(&self) -> Option<&str> {
        match self {
            RealtimeMessage::PartialTranscript(t) => Some(t.text.as_str()),
            RealtimeMessage::FinalTranscript(t) => Some(t.text.as_str()),
            _ => None,
        }
    }
}

fn is_transcript_body(o: &shape::Object) -> bool {
    shape::unsigned(o, "audio_start")
        && shape::unsigned(o, "audio_end")
        && shape::number(o, "confidence")
        && shape::string(o, "text")
        && shape::string(o, "created")
        && (!o.contains_key("words") || shape::array(o, "words"))
}

fn is_session_begins(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| {
        shape::literal(o, "message_type", "SessionBegins")
            && shape::string(o, "session_id")
            && shape::string(o, "expires_at")
    })
}

fn is_partial_transcript(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| {
        shape::literal(o, "message_type", "PartialTranscript") && is_transcript_body(o)
    })
}

fn is_final_transcript(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| {
        shape::literal(o, "message_type", "FinalTranscript")
            && is_transcript_body(o)
            && shape::boolean(o, "punctuated")
            && shape::boolean(o, "text_formatted")
    })
}

fn is_session_terminated(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| shape::literal(o, "message_type", "SessionTerminated"))
}

fn is_realtime_error(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| shape::string(o, "error"))
}

fn decode_session_begins(v: &Value) -> serde_json::Result<RealtimeMessage> {
    SessionBegins::deserialize(v).map(RealtimeMessage::SessionBegins)
}

fn decode_partial_transcript(v: &Value) -> serde_json::Result<RealtimeMessage> {
    PartialTranscript::deserialize(v).map(RealtimeMessage::PartialTranscript)
}

fn decode_final_transcript(v: &Value) -> serde_json::Result<RealtimeMessage> {
    FinalTranscript::deserialize(v).map(RealtimeMessage::FinalTranscript)
}

fn decode_session_terminated(v: &Value) -> serde_json::Result<RealtimeMessage> {
    SessionTerminated::deserialize(v).map(RealtimeMessage::SessionTerminated)
}

fn decode_realtime_error(v: &Value) -> serde_json::Result<RealtimeMessage> {
    RealtimeError::deserialize(v).map(RealtimeMessage::Error)
}

static INBOUND: [Candidate<RealtimeMessage>; 5] = [
    Candidate {
        name: "SessionBegins",
        validate: is_session_begins,
        decode: decode_session_begins,
    },
    Candidate {
        name: "PartialTranscript",
        validate: is_partial_transcript,
        decode: decode_partial_transcript,
    },
    Candidate {
        name: "FinalTranscript",
        validate: is_final_transcript,
        decode: decode_final_transcript,
    },
    Candidate {
        name: "SessionTerminated",
        validate: is_session_terminated,
        decode: decode_session_terminated,
    },
    Candidate {
        name: "RealtimeError",
        validate: is_realtime_error,
        decode: decode_realtime_error,
    },
];

impl Tagged for RealtimeMessage {
    fn candidates() -> &'static [Candidate<Self>] {
        &INBOUND
    }

    fn unknown(raw: Value) -> Self {
        RealtimeMessage::Unknown(raw)
    }
}

// =============================================================================
// Outbound Messages (Client to Server)
// =============================================================================

/// Ask the server to flush pending results and end the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminateSession {
    pub terminate_session: bool,
}

impl Default for TerminateSession {
    fn default() -> Self {
        Self {
            terminate_session: true,
        }
    }
}

/// Finalize the current utterance immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceEndUtterance {
    pub force_end_utterance: bool,
}

impl Default for ForceEndUtterance {
    fn default() -> Self {
        Self {
            force_end_utterance: true,
        }
    }
}

/// Silence, in milliseconds, after which an utterance is considered finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureEndUtteranceSilenceThreshold {
    pub end_utterance_silence_threshold: u32,
}

/// Any message the client can send.
///
/// Serializes to the JSON value of its payload; `AudioData` is a bare base64
/// string and is wrapped as `{"audio_data": ...}` only on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RealtimeOutbound {
    TerminateSession(TerminateSession),
    ForceEndUtterance(ForceEndUtterance),
    ConfigureEndUtteranceSilenceThreshold(ConfigureEndUtteranceSilenceThreshold),
    /// Base64-encoded audio
    AudioData(String),
    Unknown(Value),
}

impl RealtimeOutbound {
    /// JSON frame as sent over the socket.
    pub fn to_wire(&self) -> serde_json::Result<String> {
        match self {
            RealtimeOutbound::AudioData(audio) => Ok(json!({ "audio_data": audio }).to_string()),
            other => serde_json::to_string(other),
        }
    }
}

fn is_terminate_session(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| shape::boolean(o, "terminate_session"))
}

fn is_force_end_utterance(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| shape::boolean(o, "force_end_utterance"))
}

fn is_configure_silence_threshold(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| shape::unsigned(o, "end_utterance_silence_threshold"))
}

fn decode_terminate_session(v: &Value) -> serde_json::Result<RealtimeOutbound> {
    TerminateSession::deserialize(v).map(RealtimeOutbound::TerminateSession)
}

fn decode_force_end_utterance(v: &Value) -> serde_json::Result<RealtimeOutbound> {
    ForceEndUtterance::deserialize(v).map(RealtimeOutbound::ForceEndUtterance)
}

fn decode_configure_silence_threshold(v: &Value) -> serde_json::Result<RealtimeOutbound> {
    ConfigureEndUtteranceSilenceThreshold::deserialize(v)
        .map(RealtimeOutbound::ConfigureEndUtteranceSilenceThreshold)
}

fn decode_audio_data(v: &Value) -> serde_json::Result<RealtimeOutbound> {
    String::deserialize(v).map(RealtimeOutbound::AudioData)
}

static OUTBOUND: [Candidate<RealtimeOutbound>; 4] = [
    Candidate {
        name: "TerminateSession",
        validate: is_terminate_session,
        decode: decode_terminate_session,
    },
    Candidate {
        name: "ForceEndUtterance",
        validate: is_force_end_utterance,
        decode: decode_force_end_utterance,
    },
    Candidate {
        name: "ConfigureEndUtteranceSilenceThreshold",
        validate: is_configure_silence_threshold,
        decode: decode_configure_silence_threshold,
    },
    Candidate {
        name: "AudioData",
        validate: Value::is_string,
        decode: decode_audio_data,
    },
];

impl Tagged for RealtimeOutbound {
    fn candidates() -> &'static [Candidate<Self>] {
        &OUTBOUND
    }

    fn unknown(raw: Value) -> Self {
        RealtimeOutbound::Unknown(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_begins() {
        let json = r#"{"message_type":"SessionBegins","session_id":"abc","expires_at":"2024-01-01T00:00:00Z"}"#;
        match RealtimeMessage::from_json_str(json).unwrap() {
            RealtimeMessage::SessionBegins(begins) => {
                assert_eq!(begins.session_id, "abc");
                assert_eq!(begins.expires_at, "2024-01-01T00:00:00Z");
            }
            other => panic!("Expected SessionBegins, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_partial_transcript() {
        let json = r#"{
            "message_type": "PartialTranscript",
            "audio_start": 0,
            "audio_end": 1500,
            "confidence": 0.91,
            "text": "hello wor",
            "words": [{"start": 0, "end": 500, "confidence": 0.95, "text": "hello"}],
            "created": "2024-01-01T00:00:01.000000"
        }"#;
        let msg = RealtimeMessage::from_json_str(json).unwrap();
        assert!(!msg.is_final_transcript());
        assert_eq!(msg.text(), Some("hello wor"));
        match msg {
            RealtimeMessage::PartialTranscript(partial) => {
                assert_eq!(partial.audio_end, 1500);
                assert_eq!(partial.words.len(), 1);
            }
            other => panic!("Expected PartialTranscript, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_final_transcript() {
        let json = r#"{
            "message_type": "FinalTranscript",
            "audio_start": 0,
            "audio_end": 2000,
            "confidence": 0.97,
            "text": "Hello world.",
            "words": [],
            "created": "2024-01-01T00:00:02.000000",
            "punctuated": true,
            "text_formatted": true
        }"#;
        let msg = RealtimeMessage::from_json_str(json).unwrap();
        assert!(msg.is_final_transcript());
        assert_eq!(msg.text(), Some("Hello world."));
    }

    #[test]
    fn test_parse_session_terminated() {
        let msg = RealtimeMessage::from_json_str(r#"{"message_type":"SessionTerminated"}"#).unwrap();
        assert!(msg.is_termination());
    }

    #[test]
    fn test_parse_error() {
        let msg = RealtimeMessage::from_json_str(r#"{"error":"Audio too short"}"#).unwrap();
        assert!(msg.is_error());
    }

    #[test]
    fn test_final_without_flags_is_not_final() {
        // Missing punctuated/text_formatted: no candidate accepts it.
        let raw = serde_json::json!({
            "message_type": "FinalTranscript",
            "audio_start": 0,
            "audio_end": 10,
            "confidence": 0.5,
            "text": "x",
            "created": "2024-01-01T00:00:00"
        });
        assert_eq!(
            RealtimeMessage::from_value(raw.clone()),
            RealtimeMessage::Unknown(raw)
        );
    }

    #[test]
    fn test_outbound_wire_format() {
        assert_eq!(
            RealtimeOutbound::TerminateSession(TerminateSession::default())
                .to_wire()
                .unwrap(),
            r#"{"terminate_session":true}"#
        );
        assert_eq!(
            RealtimeOutbound::ForceEndUtterance(ForceEndUtterance::default())
                .to_wire()
                .unwrap(),
            r#"{"force_end_utterance":true}"#
        );
        assert_eq!(
            RealtimeOutbound::ConfigureEndUtteranceSilenceThreshold(
                ConfigureEndUtteranceSilenceThreshold {
                    end_utterance_silence_threshold: 700
                }
            )
            .to_wire()
            .unwrap(),
            r#"{"end_utterance_silence_threshold":700}"#
        );
        assert_eq!(
            RealtimeOutbound::AudioData("AAEC".into()).to_wire().unwrap(),
            r#"{"audio_data":"AAEC"}"#
        );
    }

    #[test]
    fn test_outbound_audio_string_decodes() {
        let msg = RealtimeOutbound::from_value(serde_json::json!("AAEC"));
        assert_eq!(msg, RealtimeOutbound::AudioData("AAEC".into()));
    }
}
