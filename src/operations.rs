//! Resumable Upload Operations
//!
//! This module implements the existence probe, the chunk upload and the
//! session loop that drives them for the resumable upload client.

use std::path::Path;

use bytes::Bytes;
use reqwest::header::HeaderValue;
use reqwest::Url;
use tokio::fs::File;
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::errors::{Result, UploadError};
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::protocol::*;
use crate::reader::ChunkReader;
use crate::types::*;

/// Handles all resumable upload operations
///
/// This struct is used internally by the Client.
pub struct Operations {
    connection: Connection,
    chunk_size: u64,
}

impl Operations {
    /// Creates a new Operations handler
    pub fn new(connection: Connection, chunk_size: u64) -> Self {
        Self {
            connection,
            chunk_size,
        }
    }

    /// Asks the server whether it already holds a chunk
    ///
    /// Transport failures are returned as errors; any HTTP answer other than
    /// 200 or 404 is returned as [`ProbeOutcome::Failed`].
    pub async fn probe_chunk(
        &self,
        url: &str,
        api_key: &str,
        chunk_index: u64,
        session: &UploadSession,
    ) -> Result<ProbeOutcome> {
        let target_url = add_query_to_url(url, &probe_query(session, chunk_index));
        let response = self.connection.get(&target_url, api_key).await?;

        Ok(ProbeOutcome::from_response(response.status, response.body))
    }

    /// Uploads one chunk as a multipart body
    ///
    /// Returns the response body on 200, a server error carrying the body
    /// otherwise.
    pub async fn upload_chunk(
        &self,
        url: &str,
        filename: &str,
        api_key: &str,
        data: Bytes,
    ) -> Result<String> {
        let boundary = generate_boundary();
        let body = encode_multipart(&boundary, filename, &data)?;
        let content_type = multipart_content_type(&boundary);

        let response = self
            .connection
            .post(url, api_key, &content_type, body)
            .await?;

        if response.status != 200 {
            return Err(UploadError::Server {
                status: response.status,
                message: response.body,
            });
        }

        Ok(response.body)
    }

    /// Uploads a local file chunk by chunk
    ///
    /// Chunks are handled strictly in order. The first failure aborts the
    /// session and nothing after it is attempted.
    pub async fn upload_file(
        &self,
        api_key: &str,
        url: &str,
        local_path: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<UploadSummary> {
        let (file, total_size) = open_source_file(local_path).await?;
        validate_request_target(api_key, url)?;

        let filename = source_filename(local_path)?;
        let session = UploadSession::new(filename, total_size, self.chunk_size);

        debug!(
            identifier = %session.identifier,
            token = %session.token,
            total_chunks = session.total_chunks,
            "upload session started"
        );
        reporter.report(&ProgressEvent::SessionStarted {
            identifier: session.identifier.clone(),
            total_size: session.total_size,
            total_chunks: session.total_chunks,
        });

        let mut reader = ChunkReader::new(file);
        let mut summary = UploadSummary {
            total_chunks: session.total_chunks,
            ..Default::default()
        };

        for chunk in session.chunks() {
            let total = session.total_chunks;

            match self.probe_chunk(url, api_key, chunk.index, &session).await? {
                ProbeOutcome::Exists => {
                    reporter.report(&ProgressEvent::ChunkExists {
                        index: chunk.index,
                        total,
                    });
                    summary.chunks_skipped += 1;
                }
                ProbeOutcome::Missing => {
                    let target_url = add_query_to_url(url, &upload_query(&session, chunk.index));
                    let data = reader.read_chunk(&chunk).await?;
                    let bytes = data.len() as u64;

                    reporter.report(&ProgressEvent::ChunkUploading {
                        index: chunk.index,
                        total,
                        bytes,
                    });

                    let response = self
                        .upload_chunk(&target_url, &session.filename, api_key, data)
                        .await?;

                    reporter.report(&ProgressEvent::ChunkUploaded {
                        index: chunk.index,
                        total,
                    });
                    summary.chunks_uploaded += 1;
                    summary.bytes_uploaded += bytes;

                    // Only the last chunk's response carries the file reference
                    if session.is_last_chunk(chunk.index) {
                        summary.final_response = Some(response);
                    }
                }
                ProbeOutcome::Failed { status, body } => {
                    warn!(chunk = chunk.index, status, "probe rejected, aborting upload");
                    return Err(UploadError::Server {
                        status,
                        message: body,
                    });
                }
            }
        }

        reporter.report(&ProgressEvent::Completed {
            response: summary.final_response.clone(),
        });

        Ok(summary)
    }
}

/// Opens the source file and returns it with its size
///
/// Anything that is not a readable regular file is reported as not found.
async fn open_source_file(path: &Path) -> Result<(File, u64)> {
    let not_found = || UploadError::FileNotFound(path.display().to_string());

    let file = File::open(path).await.map_err(|_| not_found())?;
    let metadata = file.metadata().await.map_err(|_| not_found())?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    Ok((file, metadata.len()))
}

/// Returns the base name sent as `resumableFilename`
fn source_filename(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            UploadError::InvalidArgument(format!(
                "file name is not valid UTF-8: {}",
                path.display()
            ))
        })
}

/// Checks the endpoint URL and API key before any request is sent
fn validate_request_target(api_key: &str, url: &str) -> Result<()> {
    Url::parse(url)
        .map_err(|e| UploadError::InvalidArgument(format!("invalid URL {}: {}", url, e)))?;
    HeaderValue::from_str(api_key).map_err(|_| {
        UploadError::InvalidArgument("API key is not a valid header value".to_string())
    })?;
    Ok(())
}
