//! Asynchronous transcription: submit audio, then poll until the transcript is ready.

mod client;
mod types;

pub use client::TranscriptsClient;
pub use types::{
    ListTranscriptParams, PageDetails, ParagraphsResponse, RedactedAudioResponse,
    SentencesResponse, SubtitleFormat, Transcript, TranscriptList, TranscriptListItem,
    TranscriptParagraph, TranscriptParams, TranscriptSentence, TranscriptStatus,
    TranscriptUtterance, TranscriptWord, WordSearchMatch, WordSearchResponse,
};
