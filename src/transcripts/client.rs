//! Transcripts client.

use super::types::{
    ListTranscriptParams, ParagraphsResponse, RedactedAudioResponse, SentencesResponse,
    SubtitleFormat, Transcript, TranscriptList, TranscriptParams, WordSearchResponse,
};
use crate::polling::{self, Fetch, PollingOptions};
use crate::transport::HttpTransport;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Client for `/v2/transcript`.
#[derive(Clone)]
pub struct TranscriptsClient {
    transport: Arc<HttpTransport>,
}

impl TranscriptsClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Create a transcript. Returns immediately, usually with status `queued`.
    pub async fn submit(&self, params: &TranscriptParams) -> Result<Transcript> {
        let transcript: Transcript = self.transport.post_json("/v2/transcript", params).await?;
        debug!(id = %transcript.id, status = transcript.status.as_str(), "transcript submitted");
        Ok(transcript)
    }

    pub async fn get(&self, transcript_id: &str) -> Result<Transcript> {
        self.transport
            .get_json(&format!("/v2/transcript/{transcript_id}"), &[])
            .await
    }

    /// Delete the transcript's data on the server. The returned transcript has its content redacted.
    pub async fn delete(&self, transcript_id: &str) -> Result<Transcript> {
        self.transport
            .delete_json(&format!("/v2/transcript/{transcript_id}"))
            .await
    }

    pub async fn list(&self, params: &ListTranscriptParams) -> Result<TranscriptList> {
        self.transport
            .get_json("/v2/transcript", &params.to_query())
            .await
    }

    /// Poll until the transcript is `completed` or `error`.
    ///
    /// A transcript with status `error` is returned, not raised; check
    /// [`Transcript::is_error`].
    pub async fn wait_until_ready(
        &self,
        transcript_id: &str,
        options: &PollingOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<Transcript> {
        polling::wait_until_ready(self, transcript_id, options, cancel).await
    }

    /// Submit and wait for the result.
    pub async fn transcribe(
        &self,
        params: &TranscriptParams,
        options: &PollingOptions,
    ) -> Result<Transcript> {
        let submitted = self.submit(params).await?;
        if submitted.status.is_terminal() {
            return Ok(submitted);
        }
        self.wait_until_ready(&submitted.id, options, None).await
    }

    /// Export as SRT or VTT captions.
    pub async fn get_subtitles(
        &self,
        transcript_id: &str,
        format: SubtitleFormat,
        chars_per_caption: Option<u32>,
    ) -> Result<String> {
        let query: Vec<(&str, String)> = chars_per_caption
            .map(|n| vec![("chars_per_caption", n.to_string())])
            .unwrap_or_default();
        self.transport
            .get_text(
                &format!("/v2/transcript/{transcript_id}/{}", format.as_str()),
                &query,
            )
            .await
    }

    pub async fn get_sentences(&self, transcript_id: &str) -> Result<SentencesResponse> {
        self.transport
            .get_json(&format!("/v2/transcript/{transcript_id}/sentences"), &[])
            .await
    }

    pub async fn get_paragraphs(&self, transcript_id: &str) -> Result<ParagraphsResponse> {
        self.transport
            .get_json(&format!("/v2/transcript/{transcript_id}/paragraphs"), &[])
            .await
    }

    /// Find occurrences of `words` in a completed transcript.
    pub async fn word_search(
        &self,
        transcript_id: &str,
        words: &[impl AsRef<str>],
    ) -> Result<WordSearchResponse> {
        let words = words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.transport
            .get_json(
                &format!("/v2/transcript/{transcript_id}/word-search"),
                &[("words", words)],
            )
            .await
    }

    /// URL of the PII-redacted audio, when `redact_pii_audio` was requested.
    pub async fn get_redacted_audio(&self, transcript_id: &str) -> Result<RedactedAudioResponse> {
        self.transport
            .get_json(&format!("/v2/transcript/{transcript_id}/redacted-audio"), &[])
            .await
    }
}

#[async_trait]
impl Fetch<Transcript> for TranscriptsClient {
    async fn fetch(&self, id: &str) -> Result<Transcript> {
        self.get(id).await
    }
}
