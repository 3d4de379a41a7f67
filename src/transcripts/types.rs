//! Transcript types.

use crate::polling::Pollable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle of a transcript: `queued -> processing -> completed | error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptStatus {
    /// `completed` and `error` never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, TranscriptStatus::Completed | TranscriptStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptStatus::Queued => "queued",
            TranscriptStatus::Processing => "processing",
            TranscriptStatus::Completed => "completed",
            TranscriptStatus::Error => "error",
        }
    }
}

/// A transcription job as returned by the API.
///
/// Fields this client does not model are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub status: TranscriptStatus,
    /// Present only when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<TranscriptWord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utterances: Option<Vec<TranscriptUtterance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_model: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transcript {
    pub fn is_completed(&self) -> bool {
        self.status == TranscriptStatus::Completed
    }

    pub fn is_error(&self) -> bool {
        self.status == TranscriptStatus::Error
    }
}

impl Pollable for Transcript {
    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A word with timing in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub text: String,
    pub start: u64,
    pub end: u64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

/// A speaker turn, present when speaker labels were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptUtterance {
    pub speaker: String,
    pub text: String,
    pub start: u64,
    pub end: u64,
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

/// Request body for creating a transcript.
///
/// Only `audio_url` is required. Options the struct does not name can be
/// passed through `extra`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscriptParams {
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_detection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_labels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers_expected: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub word_boost: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redact_pii: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redact_pii_policies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redact_pii_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_chapters: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_analysis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_detection: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranscriptParams {
    pub fn new(audio_url: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            ..Default::default()
        }
    }
}

/// Filters for listing transcripts.
#[derive(Debug, Clone, Default)]
pub struct ListTranscriptParams {
    pub limit: Option<u32>,
    pub status: Option<TranscriptStatus>,
    /// `YYYY-MM-DD`
    pub created_on: Option<String>,
    pub before_id: Option<String>,
    pub after_id: Option<String>,
    pub throttled_only: Option<bool>,
}

impl ListTranscriptParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(created_on) = &self.created_on {
            query.push(("created_on", created_on.clone()));
        }
        if let Some(before_id) = &self.before_id {
            query.push(("before_id", before_id.clone()));
        }
        if let Some(after_id) = &self.after_id {
            query.push(("after_id", after_id.clone()));
        }
        if let Some(throttled_only) = self.throttled_only {
            query.push(("throttled_only", throttled_only.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptList {
    pub page_details: PageDetails,
    pub transcripts: Vec<TranscriptListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDetails {
    pub limit: u32,
    pub result_count: u32,
    pub current_url: String,
    #[serde(default)]
    pub prev_url: Option<String>,
    #[serde(default)]
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptListItem {
    pub id: String,
    pub resource_url: String,
    pub status: TranscriptStatus,
    pub created: String,
    #[serde(default)]
    pub completed: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" => Ok(SubtitleFormat::Vtt),
            other => Err(crate::Error::configuration(format!(
                "unknown subtitle format '{other}', expected srt or vtt"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSentence {
    pub text: String,
    pub start: u64,
    pub end: u64,
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
    #[serde(default)]
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentencesResponse {
    pub id: String,
    pub confidence: f64,
    pub audio_duration: f64,
    pub sentences: Vec<TranscriptSentence>,
}

/// Paragraphs share the sentence layout.
pub type TranscriptParagraph = TranscriptSentence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphsResponse {
    pub id: String,
    pub confidence: f64,
    pub audio_duration: f64,
    pub paragraphs: Vec<TranscriptParagraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSearchMatch {
    pub text: String,
    pub count: u32,
    /// `[start_ms, end_ms]` pairs.
    pub timestamps: Vec<[u64; 2]>,
    pub indexes: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSearchResponse {
    pub id: String,
    pub total_count: u32,
    pub matches: Vec<WordSearchMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactedAudioResponse {
    pub status: String,
    pub redacted_audio_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_terminality() {
        assert!(!TranscriptStatus::Queued.is_terminal());
        assert!(!TranscriptStatus::Processing.is_terminal());
        assert!(TranscriptStatus::Completed.is_terminal());
        assert!(TranscriptStatus::Error.is_terminal());
    }

    #[test]
    fn transcript_keeps_unmodelled_fields() {
        let transcript: Transcript = serde_json::from_value(json!({
            "id": "t1",
            "status": "completed",
            "text": "hello",
            "words": null,
            "auto_highlights_result": {"status": "success"}
        }))
        .unwrap();
        assert!(transcript.is_completed());
        assert_eq!(transcript.words, None);
        assert_eq!(
            transcript.extra.get("auto_highlights_result"),
            Some(&json!({"status": "success"}))
        );
        let back = serde_json::to_value(&transcript).unwrap();
        assert_eq!(back["auto_highlights_result"]["status"], "success");
    }

    #[test]
    fn error_transcript_carries_message() {
        let transcript: Transcript =
            serde_json::from_str(r#"{"id":"t2","status":"error","error":"bad audio"}"#).unwrap();
        assert!(transcript.is_error());
        assert!(transcript.is_terminal());
        assert_eq!(transcript.error.as_deref(), Some("bad audio"));
    }

    #[test]
    fn params_skip_unset_options() {
        let mut params = TranscriptParams::new("https://example.com/a.mp3");
        params.speaker_labels = Some(true);
        params
            .extra
            .insert("custom_spelling".into(), json!([{"from": ["a"], "to": "b"}]));
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(
            body,
            json!({
                "audio_url": "https://example.com/a.mp3",
                "speaker_labels": true,
                "custom_spelling": [{"from": ["a"], "to": "b"}]
            })
        );
    }

    #[test]
    fn list_query_only_includes_set_filters() {
        let params = ListTranscriptParams {
            limit: Some(5),
            status: Some(TranscriptStatus::Completed),
            ..Default::default()
        };
        assert_eq!(
            params.to_query(),
            vec![("limit", "5".to_string()), ("status", "completed".to_string())]
        );
    }
}
