//! Client entry points.
//!
//! Keep the public surface small: a builder, and one client handing out
//! per-resource clients that share a transport.

pub mod builder;
pub mod core;

pub use builder::ClientBuilder;
pub use self::core::AssemblyAiClient;
