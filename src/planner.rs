//! Chunk planning
//!
//! Splits a file of `total_size` bytes into 1-based chunks of `chunk_size`
//! bytes. The chunk count is always `total_size / chunk_size + 1`, so an
//! empty file has one empty chunk and a file whose size is an exact multiple
//! of the chunk size ends with an empty chunk. Servers speaking this protocol
//! expect that count.

use std::ops::Range;

use crate::types::ChunkDescriptor;

/// Returns the number of chunks for a file
///
/// `chunk_size` must be greater than zero.
pub fn total_chunks(total_size: u64, chunk_size: u64) -> u64 {
    debug_assert!(chunk_size > 0, "chunk size must be positive");
    total_size / chunk_size + 1
}

/// Returns the byte range of chunk `index`, clipped to the file size
pub fn chunk_range(index: u64, total_size: u64, chunk_size: u64) -> Range<u64> {
    debug_assert!(index >= 1, "chunk indices are 1-based");
    let start = index
        .saturating_sub(1)
        .saturating_mul(chunk_size)
        .min(total_size);
    let end = index.saturating_mul(chunk_size).min(total_size);
    start..end
}

/// Builds the ordered list of chunks covering a file
pub fn plan(total_size: u64, chunk_size: u64) -> Vec<ChunkDescriptor> {
    let count = total_chunks(total_size, chunk_size);
    (1..=count)
        .map(|index| ChunkDescriptor::new(index, total_size, chunk_size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MB;

    #[test]
    fn test_empty_file_has_one_chunk() {
        assert_eq!(total_chunks(0, 5 * MB), 1);

        let chunks = plan(0, 5 * MB);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(chunks[0].size, 0);
    }

    #[test]
    fn test_twelve_mib_file() {
        let chunks = plan(12 * MB, 5 * MB);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].offset..chunks[0].end(), 0..5 * MB);
        assert_eq!(chunks[1].offset..chunks[1].end(), 5 * MB..10 * MB);
        assert_eq!(chunks[2].offset..chunks[2].end(), 10 * MB..12 * MB);
    }

    #[test]
    fn test_exact_multiple_adds_empty_chunk() {
        let chunks = plan(10 * MB, 5 * MB);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].offset, 10 * MB);
        assert_eq!(chunks[2].size, 0);
    }

    #[test]
    fn test_ranges_cover_file_exactly_once() {
        for chunk_size in [1u64, 3, 4, 7, 64] {
            for total_size in 0u64..200 {
                let chunks = plan(total_size, chunk_size);
                assert_eq!(chunks.len() as u64, total_size / chunk_size + 1);

                let mut cursor = 0;
                for (i, chunk) in chunks.iter().enumerate() {
                    assert_eq!(chunk.index, i as u64 + 1);
                    assert_eq!(chunk.offset, cursor, "gap or overlap before chunk {}", chunk.index);
                    assert!(chunk.size <= chunk_size);
                    cursor = chunk.end();
                }
                assert_eq!(cursor, total_size);
            }
        }
    }
}
