//! Resumable Upload Client
//!
//! Main client struct for uploading files to a resumable.js-compatible endpoint.

use std::path::Path;

use bytes::Bytes;

use crate::connection::Connection;
use crate::errors::{Result, UploadError};
use crate::operations::Operations;
use crate::progress::{ProgressReporter, TracingReporter};
use crate::types::{ClientConfig, ProbeOutcome, UploadSession, UploadSummary};

/// Client for chunked, resumable uploads
///
/// One client holds one HTTP connection pool that every request of a session
/// goes through. Sessions run sequentially; the client performs no retries.
///
/// # Example
///
/// ```no_run
/// use resumable_upload::{Client, ClientConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new(ClientConfig::new().with_request_timeout(30_000))?;
///
///     let summary = client
///         .upload("my-api-key", "https://example.com/upload", "video.mp4")
///         .await?;
///     println!("{:?}", summary.final_response);
///     Ok(())
/// }
/// ```
pub struct Client {
    config: ClientConfig,
    ops: Operations,
}

impl Client {
    /// Creates a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::validate_config(&config)?;

        let connection = Connection::new(&config)?;
        let ops = Operations::new(connection, config.chunk_size);

        Ok(Self { config, ops })
    }

    /// Validates the client configuration
    fn validate_config(config: &ClientConfig) -> Result<()> {
        if config.chunk_size == 0 {
            return Err(UploadError::InvalidArgument(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        if config.user_agent.is_empty() {
            return Err(UploadError::InvalidArgument(
                "User agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the configuration the client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uploads a local file, logging progress through `tracing`
    pub async fn upload(
        &self,
        api_key: &str,
        url: &str,
        local_path: impl AsRef<Path>,
    ) -> Result<UploadSummary> {
        self.upload_with_reporter(api_key, url, local_path, &TracingReporter)
            .await
    }

    /// Uploads a local file, sending progress events to `reporter`
    pub async fn upload_with_reporter(
        &self,
        api_key: &str,
        url: &str,
        local_path: impl AsRef<Path>,
        reporter: &dyn ProgressReporter,
    ) -> Result<UploadSummary> {
        self.ops
            .upload_file(api_key, url, local_path.as_ref(), reporter)
            .await
    }

    /// Asks the server whether it already holds a chunk of a session
    pub async fn probe_chunk(
        &self,
        api_key: &str,
        url: &str,
        chunk_index: u64,
        session: &UploadSession,
    ) -> Result<ProbeOutcome> {
        if session.chunk(chunk_index).is_none() {
            return Err(UploadError::InvalidArgument(format!(
                "chunk {} outside 1..={}",
                chunk_index, session.total_chunks
            )));
        }
        self.ops.probe_chunk(url, api_key, chunk_index, session).await
    }

    /// Uploads raw chunk bytes to a fully built upload URL
    pub async fn upload_chunk(
        &self,
        api_key: &str,
        url: &str,
        filename: &str,
        data: impl Into<Bytes>,
    ) -> Result<String> {
        self.ops
            .upload_chunk(url, filename, api_key, data.into())
            .await
    }
}
