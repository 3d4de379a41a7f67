//! Real-time streaming transcription over WebSocket.
//!
//! ```rust,no_run
//! use assemblyai::realtime::{RealtimeConfig, RealtimeMessage};
//!
//! #[tokio::main]
//! async fn main() -> assemblyai::Result<()> {
//!     let client = assemblyai::ClientBuilder::new().build()?;
//!     let mut session = client.realtime().connect(&RealtimeConfig::default()).await?;
//!
//!     session.send_audio(&[0u8; 3200]).await?;
//!     while let Some(message) = session.recv().await? {
//!         if let RealtimeMessage::FinalTranscript(t) = &message {
//!             println!("{}", t.text);
//!             break;
//!         }
//!     }
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod messages;

pub use client::{AudioEncoding, RealtimeClient, RealtimeConfig, RealtimeSession};
pub use messages::{
    ConfigureEndUtteranceSilenceThreshold, FinalTranscript, ForceEndUtterance,
    PartialTranscript, RealtimeError, RealtimeMessage, RealtimeOutbound, RealtimeWord,
    SessionBegins, SessionTerminated, TerminateSession,
};
