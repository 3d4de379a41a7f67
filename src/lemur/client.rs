//! LeMUR client.

use super::types::{
    LemurActionItemsParams, LemurActionItemsResponse, LemurQuestionAnswerParams,
    LemurQuestionAnswerResponse, LemurResponse, LemurSummaryParams, LemurSummaryResponse,
    LemurTaskParams, LemurTaskResponse, PurgeLemurRequestDataResponse,
};
use crate::tagged::Tagged;
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Client for `/lemur/v3`.
#[derive(Clone)]
pub struct LemurClient {
    transport: Arc<HttpTransport>,
}

impl LemurClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Run a custom prompt over transcripts.
    pub async fn task(&self, params: &LemurTaskParams) -> Result<LemurTaskResponse> {
        self.transport
            .post_json("/lemur/v3/generate/task", params)
            .await
    }

    pub async fn summary(&self, params: &LemurSummaryParams) -> Result<LemurSummaryResponse> {
        self.transport
            .post_json("/lemur/v3/generate/summary", params)
            .await
    }

    pub async fn question_answer(
        &self,
        params: &LemurQuestionAnswerParams,
    ) -> Result<LemurQuestionAnswerResponse> {
        self.transport
            .post_json("/lemur/v3/generate/question-answer", params)
            .await
    }

    pub async fn action_items(
        &self,
        params: &LemurActionItemsParams,
    ) -> Result<LemurActionItemsResponse> {
        self.transport
            .post_json("/lemur/v3/generate/action-items", params)
            .await
    }

    /// Fetch a previous response. The variant is chosen by shape; see [`LemurResponse`].
    pub async fn get_response(&self, request_id: &str) -> Result<LemurResponse> {
        let raw: serde_json::Value = self
            .transport
            .get_json(&format!("/lemur/v3/{request_id}"), &[])
            .await?;
        let response = LemurResponse::from_value(raw);
        if let LemurResponse::Unknown(_) = response {
            debug!(request_id, "LeMUR response did not match a known shape");
        }
        Ok(response)
    }

    /// Delete the data stored for a LeMUR request.
    pub async fn purge_request_data(
        &self,
        request_id: &str,
    ) -> Result<PurgeLemurRequestDataResponse> {
        self.transport
            .delete_json(&format!("/lemur/v3/{request_id}"))
            .await
    }
}
