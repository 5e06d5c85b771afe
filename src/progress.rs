//! Upload progress reporting
//!
//! The orchestrator never writes to a display. It emits [`ProgressEvent`]s
//! to a caller-supplied [`ProgressReporter`].

use std::fmt;

use tracing::info;

/// Something that happened during an upload session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Session metadata was computed and the first probe is about to be sent
    SessionStarted {
        identifier: String,
        total_size: u64,
        total_chunks: u64,
    },
    /// Server already had the chunk
    ChunkExists { index: u64, total: u64 },
    /// Chunk bytes were read and are about to be sent
    ChunkUploading { index: u64, total: u64, bytes: u64 },
    /// Server accepted the chunk
    ChunkUploaded { index: u64, total: u64 },
    /// Every chunk was handled
    Completed { response: Option<String> },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::SessionStarted {
                identifier,
                total_size,
                total_chunks,
            } => write!(
                f,
                "Uploading {} ({} bytes in {} chunks)",
                identifier, total_size, total_chunks
            ),
            ProgressEvent::ChunkExists { index, total } => {
                write!(f, "[{}/{}] Chunk exists!", index, total)
            }
            ProgressEvent::ChunkUploading { index, total, bytes } => write!(
                f,
                "[{}/{}] Uploading chunk of size {} bytes",
                index, total, bytes
            ),
            ProgressEvent::ChunkUploaded { index, total } => {
                write!(f, "[{}/{}] Chunk uploaded", index, total)
            }
            ProgressEvent::Completed { response: Some(response) } => {
                write!(f, "Result:\n{}", response)
            }
            ProgressEvent::Completed { response: None } => write!(f, "Upload complete"),
        }
    }
}

/// Receives progress events from an upload session
pub trait ProgressReporter: Send + Sync {
    /// Called once per event, in session order
    fn report(&self, event: &ProgressEvent);
}

impl<F> ProgressReporter for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn report(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Logs every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: &ProgressEvent) {
        info!("{}", event);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: &ProgressEvent) {}
}
