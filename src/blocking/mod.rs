//! Blocking client for synchronous callers.
//!
//! Polling sleeps the calling thread. Do not use from inside an async runtime;
//! use [`crate::AssemblyAiClient`] there instead.

use crate::config::ClientConfig;
use crate::files::UploadedFile;
use crate::polling::blocking::{self as blocking_polling, BlockingFetch};
use crate::polling::PollingOptions;
use crate::transcripts::{ListTranscriptParams, Transcript, TranscriptList, TranscriptParams};
use crate::transport::BlockingHttpTransport;
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Clone)]
pub struct AssemblyAiClient {
    transport: Arc<BlockingHttpTransport>,
}

impl AssemblyAiClient {
    pub fn from_env() -> Result<Self> {
        crate::ClientBuilder::new().build_blocking()
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(BlockingHttpTransport::new(&config)?),
        })
    }

    pub fn transcripts(&self) -> TranscriptsClient {
        TranscriptsClient {
            transport: self.transport.clone(),
        }
    }

    pub fn files(&self) -> FilesClient {
        FilesClient {
            transport: self.transport.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TranscriptsClient {
    transport: Arc<BlockingHttpTransport>,
}

impl TranscriptsClient {
    pub fn submit(&self, params: &TranscriptParams) -> Result<Transcript> {
        let transcript: Transcript = self.transport.post_json("/v2/transcript", params)?;
        debug!(id = %transcript.id, status = transcript.status.as_str(), "transcript submitted");
        Ok(transcript)
    }

    pub fn get(&self, transcript_id: &str) -> Result<Transcript> {
        self.transport
            .get_json(&format!("/v2/transcript/{transcript_id}"), &[])
    }

    pub fn delete(&self, transcript_id: &str) -> Result<Transcript> {
        self.transport
            .delete_json(&format!("/v2/transcript/{transcript_id}"))
    }

    pub fn list(&self, params: &ListTranscriptParams) -> Result<TranscriptList> {
        self.transport.get_json("/v2/transcript", &params.to_query())
    }

    /// Poll on the current thread until the transcript is `completed` or `error`.
    pub fn wait_until_ready(
        &self,
        transcript_id: &str,
        options: &PollingOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<Transcript> {
        blocking_polling::wait_until_ready(self, transcript_id, options, cancel)
    }

    pub fn transcribe(&self, params: &TranscriptParams, options: &PollingOptions) -> Result<Transcript> {
        let submitted = self.submit(params)?;
        if submitted.status.is_terminal() {
            return Ok(submitted);
        }
        self.wait_until_ready(&submitted.id, options, None)
    }
}

impl BlockingFetch<Transcript> for TranscriptsClient {
    fn fetch(&self, id: &str) -> Result<Transcript> {
        self.get(id)
    }
}

#[derive(Clone)]
pub struct FilesClient {
    transport: Arc<BlockingHttpTransport>,
}

impl FilesClient {
    pub fn upload(&self, data: Vec<u8>) -> Result<UploadedFile> {
        debug!(bytes = data.len(), "uploading media");
        self.transport.post_bytes("/v2/upload", data)
    }

    pub fn upload_file(&self, path: impl AsRef<Path>) -> Result<UploadedFile> {
        self.upload(std::fs::read(path)?)
    }
}
