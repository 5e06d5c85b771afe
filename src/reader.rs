//! Sequential chunk reader
//!
//! Reads chunk bytes from the source file while tracking how many bytes have
//! been consumed. The cursor only moves forward: skipped chunks are jumped
//! over with a forward seek, and a chunk that starts behind the cursor is an
//! error.

use std::io::SeekFrom;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use crate::errors::{Result, UploadError};
use crate::types::ChunkDescriptor;

/// Forward-only reader over a chunked source
pub struct ChunkReader<R> {
    inner: R,
    bytes_consumed: u64,
}

impl<R> ChunkReader<R>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    /// Wraps a source positioned at its first byte
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_consumed: 0,
        }
    }

    /// Position of the cursor in bytes
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    /// Reads up to `chunk.size` bytes starting at `chunk.offset`
    ///
    /// The returned buffer is shorter than `chunk.size` only if the source
    /// ends early.
    pub async fn read_chunk(&mut self, chunk: &ChunkDescriptor) -> Result<Bytes> {
        if chunk.offset < self.bytes_consumed {
            return Err(UploadError::OutOfOrderRead {
                index: chunk.index,
                offset: chunk.offset,
                consumed: self.bytes_consumed,
            });
        }

        if chunk.offset > self.bytes_consumed {
            self.inner.seek(SeekFrom::Start(chunk.offset)).await?;
            self.bytes_consumed = chunk.offset;
        }

        let mut buffer = Vec::with_capacity(chunk.size as usize);
        (&mut self.inner)
            .take(chunk.size)
            .read_to_end(&mut buffer)
            .await?;
        self.bytes_consumed += buffer.len() as u64;

        Ok(Bytes::from(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner;
    use std::io::Cursor;

    fn source(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_reads_chunks_in_order() {
        let data = source(10);
        let mut reader = ChunkReader::new(Cursor::new(data.clone()));

        let mut collected = Vec::new();
        for chunk in planner::plan(10, 4) {
            let bytes = reader.read_chunk(&chunk).await.unwrap();
            assert_eq!(bytes.len() as u64, chunk.size);
            collected.extend_from_slice(&bytes);
        }

        assert_eq!(collected, data);
        assert_eq!(reader.bytes_consumed(), 10);
    }

    #[tokio::test]
    async fn test_skipped_chunk_seeks_forward() {
        let data = source(10);
        let chunks = planner::plan(10, 4);
        let mut reader = ChunkReader::new(Cursor::new(data.clone()));

        let bytes = reader.read_chunk(&chunks[1]).await.unwrap();

        assert_eq!(bytes.as_ref(), &data[4..8]);
        assert_eq!(reader.bytes_consumed(), 8);
    }

    #[tokio::test]
    async fn test_rejects_backward_read() {
        let chunks = planner::plan(10, 4);
        let mut reader = ChunkReader::new(Cursor::new(source(10)));

        reader.read_chunk(&chunks[1]).await.unwrap();
        let err = reader.read_chunk(&chunks[0]).await.unwrap_err();

        assert!(matches!(
            err,
            UploadError::OutOfOrderRead {
                index: 1,
                offset: 0,
                consumed: 8
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_trailing_chunk() {
        let chunks = planner::plan(8, 4);
        let mut reader = ChunkReader::new(Cursor::new(source(8)));

        for chunk in &chunks[..2] {
            reader.read_chunk(chunk).await.unwrap();
        }
        let last = reader.read_chunk(&chunks[2]).await.unwrap();

        assert!(last.is_empty());
    }
}
