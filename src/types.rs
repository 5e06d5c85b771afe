//! Resumable Upload Protocol Types and Constants
//!
//! This module defines the protocol-level constants, query parameter names,
//! and data structures shared by the planner, prober, uploader and orchestrator.

use std::collections::HashMap;

use uuid::Uuid;

use crate::planner;

/// One mebibyte
pub const MB: u64 = 1024 * 1024;

/// Chunk size used by the reference servers
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * MB;

/// Query parameter names
pub const PARAM_CHUNK_NUMBER: &str = "resumableChunkNumber";
pub const PARAM_FILENAME: &str = "resumableFilename";
pub const PARAM_CHUNK_SIZE: &str = "resumableChunkSize";
pub const PARAM_TOTAL_SIZE: &str = "resumableTotalSize";
pub const PARAM_IDENTIFIER: &str = "resumableIdentifier";
pub const PARAM_TOTAL_CHUNKS: &str = "resumableTotalChunks";
pub const PARAM_UPLOAD_TOKEN: &str = "uploadToken";

/// Multipart form field carrying the chunk bytes
pub const MULTIPART_FIELD_NAME: &str = "file";

/// Content type of the chunk part
pub const CHUNK_CONTENT_TYPE: &str = "application/octet-stream";

/// Query parameter dictionary type
///
/// Iteration order is unspecified, so servers must read parameters
/// independently of their position in the query string.
pub type QueryParams = HashMap<String, String>;

/// Identity of one file transfer attempt
///
/// Created once per upload and never mutated afterwards. The identifier and
/// token are sent with every request of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    /// Size of the source file in bytes
    pub total_size: u64,
    /// Base name of the source file
    pub filename: String,
    /// `"{total_size}-{filename}"`
    pub identifier: String,
    /// Size of every chunk except the last
    pub chunk_size: u64,
    /// Number of chunks, always at least 1
    pub total_chunks: u64,
    /// Per-session unique token correlating probes and uploads
    pub token: String,
}

impl UploadSession {
    /// Creates a session with a freshly generated token
    pub fn new(filename: impl Into<String>, total_size: u64, chunk_size: u64) -> Self {
        Self::with_token(
            filename,
            total_size,
            chunk_size,
            Uuid::new_v4().to_string(),
        )
    }

    /// Creates a session with a caller-supplied token
    pub fn with_token(
        filename: impl Into<String>,
        total_size: u64,
        chunk_size: u64,
        token: impl Into<String>,
    ) -> Self {
        let filename = filename.into();
        Self {
            total_size,
            identifier: format!("{}-{}", total_size, filename),
            filename,
            chunk_size,
            total_chunks: planner::total_chunks(total_size, chunk_size),
            token: token.into(),
        }
    }

    /// Returns the descriptor of a chunk, or None outside `1..=total_chunks`
    pub fn chunk(&self, index: u64) -> Option<ChunkDescriptor> {
        if index == 0 || index > self.total_chunks {
            return None;
        }
        Some(ChunkDescriptor::new(index, self.total_size, self.chunk_size))
    }

    /// Iterates over every chunk of the session in upload order
    pub fn chunks(&self) -> impl Iterator<Item = ChunkDescriptor> + '_ {
        (1..=self.total_chunks)
            .map(move |index| ChunkDescriptor::new(index, self.total_size, self.chunk_size))
    }

    /// Returns true if `index` is the last chunk of the session
    pub fn is_last_chunk(&self, index: u64) -> bool {
        index == self.total_chunks
    }
}

/// One unit of work: a contiguous byte range of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// 1-based chunk index
    pub index: u64,
    /// Offset of the first byte of the chunk
    pub offset: u64,
    /// Number of bytes in the chunk, 0 for a trailing empty chunk
    pub size: u64,
}

impl ChunkDescriptor {
    pub(crate) fn new(index: u64, total_size: u64, chunk_size: u64) -> Self {
        let range = planner::chunk_range(index, total_size, chunk_size);
        Self {
            index,
            offset: range.start,
            size: range.end - range.start,
        }
    }

    /// Offset one past the last byte of the chunk
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// Result of asking the server whether it already holds a chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Server already has the chunk, skip it
    Exists,
    /// Server does not have the chunk, upload it
    Missing,
    /// Any other answer, abort the session
    Failed { status: u16, body: String },
}

impl ProbeOutcome {
    /// Maps a probe response to an outcome
    ///
    /// Status codes:
    ///   - 200: chunk exists
    ///   - 404: chunk missing
    ///   - anything else: failure carrying the response body
    pub fn from_response(status: u16, body: String) -> Self {
        match status {
            200 => ProbeOutcome::Exists,
            404 => ProbeOutcome::Missing,
            _ => ProbeOutcome::Failed { status, body },
        }
    }
}

/// What a completed upload session did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Number of chunks in the session
    pub total_chunks: u64,
    /// Chunks transmitted to the server
    pub chunks_uploaded: u64,
    /// Chunks the server already had
    pub chunks_skipped: u64,
    /// Bytes of file content transmitted
    pub bytes_uploaded: u64,
    /// Response to the final chunk, None if the server already had it
    pub final_response: Option<String>,
}

/// Client configuration options
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Chunk size in bytes
    pub chunk_size: u64,
    /// Timeout for establishing connections in milliseconds, None for no timeout
    pub connect_timeout: Option<u64>,
    /// Timeout for a whole request in milliseconds, None for no timeout
    pub request_timeout: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: None,
            request_timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size in bytes
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the connection timeout in milliseconds
    pub fn with_connect_timeout(mut self, timeout: u64) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the request timeout in milliseconds
    pub fn with_request_timeout(mut self, timeout: u64) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
