use crate::config::ClientConfig;
use crate::files::FilesClient;
use crate::lemur::LemurClient;
use crate::realtime::RealtimeClient;
use crate::transcripts::TranscriptsClient;
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Async client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct AssemblyAiClient {
    config: Arc<ClientConfig>,
    transport: Arc<HttpTransport>,
}

impl AssemblyAiClient {
    /// Build from `ASSEMBLYAI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        crate::ClientBuilder::new().build()
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        info!(base_url = %config.base_url, "AssemblyAI client ready");
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transcripts(&self) -> TranscriptsClient {
        TranscriptsClient::new(self.transport.clone())
    }

    pub fn files(&self) -> FilesClient {
        FilesClient::new(self.transport.clone())
    }

    pub fn lemur(&self) -> LemurClient {
        LemurClient::new(self.transport.clone())
    }

    pub fn realtime(&self) -> RealtimeClient {
        RealtimeClient::new(self.transport.clone(), self.config.realtime_url.clone())
    }
}
