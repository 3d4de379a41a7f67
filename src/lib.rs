//! # assemblyai
//!
//! Async and blocking client for the AssemblyAI API: batch transcription with
//! polling, real-time streaming transcription, and LeMUR.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use assemblyai::polling::PollingOptions;
//! use assemblyai::transcripts::TranscriptParams;
//!
//! #[tokio::main]
//! async fn main() -> assemblyai::Result<()> {
//!     let client = assemblyai::ClientBuilder::new()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     let transcript = client
//!         .transcripts()
//!         .transcribe(
//!             &TranscriptParams::new("https://assembly.ai/espn.m4a"),
//!             &PollingOptions::default(),
//!         )
//!         .await?;
//!
//!     if transcript.is_error() {
//!         eprintln!("failed: {:?}", transcript.error);
//!     } else {
//!         println!("{}", transcript.text.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transcripts`] | Submit, fetch, list, delete and export transcripts |
//! | [`polling`] | Wait until a job reaches a terminal status |
//! | [`tagged`] | Ordered structural decoding of untagged JSON unions |
//! | [`realtime`] | WebSocket streaming transcription |
//! | [`lemur`] | LLM tasks over transcripts |
//! | [`files`] | Media upload |
//! | [`blocking`] | Synchronous client |
//! | [`transport`] | HTTP plumbing |

pub mod blocking;
pub mod client;
pub mod config;
pub mod files;
pub mod lemur;
pub mod polling;
pub mod realtime;
pub mod tagged;
pub mod transcripts;
pub mod transport;

pub use client::{AssemblyAiClient, ClientBuilder};
pub use polling::PollingOptions;
pub use tagged::Tagged;
pub use tokio_util::sync::CancellationToken;
pub use transcripts::{Transcript, TranscriptStatus};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
