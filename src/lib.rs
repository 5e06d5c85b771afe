//! Resumable Upload Client Library
//!
//! Client for the resumable.js chunked upload handshake. A local file is split
//! into fixed-size chunks; for each chunk the server is probed and only the
//! chunks it does not already hold are uploaded as multipart bodies.
//!
//! # Features
//!
//! - Deterministic chunk planning (5 MiB chunks by default)
//! - Per-chunk existence probe before upload
//! - Bit-exact multipart encoding of chunk bodies
//! - Sequential, fail-fast session loop with typed errors
//! - Pluggable progress reporting
//! - Async/await support with Tokio
//!
//! # Example
//!
//! ```no_run
//! use resumable_upload::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::default())?;
//!     let summary = client
//!         .upload("api-key", "http://localhost:8080/upload", "archive.zip")
//!         .await?;
//!
//!     if let Some(reference) = summary.final_response {
//!         println!("File reference: {}", reference);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod client;
mod connection;
mod errors;
mod operations;
pub mod planner;
pub mod progress;
pub mod protocol;
mod reader;
mod types;

// Re-export public API
pub use client::Client;
pub use errors::{Result, UploadError};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, TracingReporter};
pub use reader::ChunkReader;
pub use types::{
    ChunkDescriptor, ClientConfig, ProbeOutcome, QueryParams, UploadSession, UploadSummary,
    CHUNK_CONTENT_TYPE, DEFAULT_CHUNK_SIZE, MB, MULTIPART_FIELD_NAME, PARAM_CHUNK_NUMBER,
    PARAM_CHUNK_SIZE, PARAM_FILENAME, PARAM_IDENTIFIER, PARAM_TOTAL_CHUNKS, PARAM_TOTAL_SIZE,
    PARAM_UPLOAD_TOKEN,
};
