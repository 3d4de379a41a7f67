//! Media upload. The returned `upload_url` can be used as a transcript's `audio_url`.

use crate::transport::HttpTransport;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub upload_url: String,
}

/// Client for `/v2/upload`.
#[derive(Clone)]
pub struct FilesClient {
    transport: Arc<HttpTransport>,
}

impl FilesClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn upload(&self, data: impl Into<bytes::Bytes>) -> Result<UploadedFile> {
        let data: bytes::Bytes = data.into();
        debug!(bytes = data.len(), "uploading media");
        self.transport.post_body("/v2/upload", data.into()).await
    }

    /// Stream a local file to the API without reading it into memory.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<UploadedFile> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        debug!(path = %path.display(), "uploading media file");
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        self.transport.post_body("/v2/upload", body).await
    }
}
