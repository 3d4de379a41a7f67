//! LeMUR: LLM prompts, summaries, Q&A and action items over finished transcripts.

mod client;
mod types;

pub use client::LemurClient;
pub use types::{
    LemurActionItemsParams, LemurActionItemsResponse, LemurBaseParams, LemurQuestion,
    LemurQuestionAnswer, LemurQuestionAnswerParams, LemurQuestionAnswerResponse, LemurResponse,
    LemurStringResponse, LemurSummaryParams, LemurSummaryResponse, LemurTaskParams,
    LemurTaskResponse, LemurUsage, PurgeLemurRequestDataResponse,
};
