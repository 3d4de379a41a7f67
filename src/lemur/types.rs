//! LeMUR request and response types.

use crate::tagged::{shape, Candidate, Tagged};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields shared by every LeMUR request.
///
/// Provide either `transcript_ids` or `input_text`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LemurBaseParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transcript_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,
    /// Free-form string or object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl LemurBaseParams {
    pub fn for_transcripts<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transcript_ids: ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LemurTaskParams {
    pub prompt: String,
    #[serde(flatten)]
    pub base: LemurBaseParams,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LemurSummaryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_format: Option<String>,
    #[serde(flatten)]
    pub base: LemurBaseParams,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LemurActionItemsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_format: Option<String>,
    #[serde(flatten)]
    pub base: LemurBaseParams,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LemurQuestion {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_options: Option<Vec<String>>,
}

impl LemurQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LemurQuestionAnswerParams {
    pub questions: Vec<LemurQuestion>,
    #[serde(flatten)]
    pub base: LemurBaseParams,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemurUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Response whose payload is free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LemurStringResponse {
    pub request_id: String,
    pub response: String,
    pub usage: LemurUsage,
}

pub type LemurTaskResponse = LemurStringResponse;
pub type LemurSummaryResponse = LemurStringResponse;
pub type LemurActionItemsResponse = LemurStringResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LemurQuestionAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LemurQuestionAnswerResponse {
    pub request_id: String,
    pub response: Vec<LemurQuestionAnswer>,
    pub usage: LemurUsage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeLemurRequestDataResponse {
    pub request_id: String,
    pub request_id_to_purge: String,
    pub deleted: bool,
}

/// A stored LeMUR response fetched by request id.
///
/// Task, summary and action-item responses have identical shapes, so a
/// free-text response always decodes as [`LemurResponse::Task`]. Callers that
/// know which endpoint produced the request should use the typed methods on
/// [`super::LemurClient`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum LemurResponse {
    Task(LemurTaskResponse),
    Summary(LemurSummaryResponse),
    QuestionAnswer(LemurQuestionAnswerResponse),
    ActionItems(LemurActionItemsResponse),
    Unknown(Value),
}

impl LemurResponse {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            LemurResponse::Task(r) | LemurResponse::Summary(r) | LemurResponse::ActionItems(r) => {
                Some(r.request_id.as_str())
            }
            LemurResponse::QuestionAnswer(r) => Some(r.request_id.as_str()),
            LemurResponse::Unknown(raw) => raw.get("request_id").and_then(Value::as_str),
        }
    }
}

fn is_string_response(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| {
        shape::string(o, "request_id") && shape::string(o, "response") && shape::nested(o, "usage")
    })
}

fn is_question_answer(v: &Value) -> bool {
    shape::object(v).is_some_and(|o| {
        shape::string(o, "request_id")
            && shape::array_of(o, "response", |item| {
                shape::object(item)
                    .is_some_and(|qa| shape::string(qa, "question") && shape::string(qa, "answer"))
            })
            && shape::nested(o, "usage")
    })
}

fn decode_task(v: &Value) -> serde_json::Result<LemurResponse> {
    LemurStringResponse::deserialize(v).map(LemurResponse::Task)
}

fn decode_summary(v: &Value) -> serde_json::Result<LemurResponse> {
    LemurStringResponse::deserialize(v).map(LemurResponse::Summary)
}

fn decode_question_answer(v: &Value) -> serde_json::Result<LemurResponse> {
    LemurQuestionAnswerResponse::deserialize(v).map(LemurResponse::QuestionAnswer)
}

fn decode_action_items(v: &Value) -> serde_json::Result<LemurResponse> {
    LemurStringResponse::deserialize(v).map(LemurResponse::ActionItems)
}

static LEMUR_RESPONSES: [Candidate<LemurResponse>; 4] = [
    Candidate {
        name: "Task",
        validate: is_string_response,
        decode: decode_task,
    },
    Candidate {
        name: "Summary",
        validate: is_string_response,
        decode: decode_summary,
    },
    Candidate {
        name: "QuestionAnswer",
        validate: is_question_answer,
        decode: decode_question_answer,
    },
    Candidate {
        name: "ActionItems",
        validate: is_string_response,
        decode: decode_action_items,
    },
];

impl Tagged for LemurResponse {
    fn candidates() -> &'static [Candidate<Self>] {
        &LEMUR_RESPONSES
    }

    fn unknown(raw: Value) -> Self {
        LemurResponse::Unknown(raw)
    }
}
