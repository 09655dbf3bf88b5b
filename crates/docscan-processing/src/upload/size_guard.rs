//! Byte accounting for the accepted part.

use bytes::Bytes;
use docscan_core::UploadErrorKind;

/// What [`SizeGuard::push`] did with a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkVerdict {
    Accepted,
    /// This chunk took the running total past the limit. Reported once.
    Exceeded,
    /// The guard had already tripped; the chunk was discarded.
    Ignored,
}

/// Accumulates chunks of one part and trips once the total passes `limit`.
///
/// A total exactly equal to the limit is accepted. Tripping releases every
/// retained chunk and is sticky.
#[derive(Debug)]
pub struct SizeGuard {
    limit: usize,
    received: usize,
    chunks: Vec<Bytes>,
    exceeded: bool,
}

impl SizeGuard {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            received: 0,
            chunks: Vec::new(),
            exceeded: false,
        }
    }

    pub fn push(&mut self, chunk: Bytes) -> ChunkVerdict {
        if self.exceeded {
            return ChunkVerdict::Ignored;
        }

        self.received = self.received.saturating_add(chunk.len());
        if self.received > self.limit {
            self.exceeded = true;
            self.chunks = Vec::new();
            tracing::debug!(
                received = self.received,
                limit = self.limit,
                "Upload part exceeded size limit"
            );
            return ChunkVerdict::Exceeded;
        }

        self.chunks.push(chunk);
        ChunkVerdict::Accepted
    }

    /// Bytes counted so far, including the chunk that tripped the guard.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Bytes currently held in memory.
    pub fn retained_bytes(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    /// Concatenate the retained chunks in arrival order.
    pub fn finish(self) -> Result<Vec<u8>, UploadErrorKind> {
        if self.exceeded {
            return Err(UploadErrorKind::FileTooLarge);
        }

        let mut buffer = Vec::with_capacity(self.received);
        for chunk in &self.chunks {
            buffer.extend_from_slice(chunk);
        }

        if buffer.len() != self.received {
            tracing::warn!(
                assembled = buffer.len(),
                received = self.received,
                "Assembled upload length does not match received byte count"
            );
            return Err(UploadErrorKind::MalformedMultipart);
        }

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_are_assembled_in_order() {
        let mut guard = SizeGuard::new(16);
        assert_eq!(guard.push(Bytes::from_static(b"abc")), ChunkVerdict::Accepted);
        assert_eq!(guard.push(Bytes::from_static(b"def")), ChunkVerdict::Accepted);
        assert_eq!(guard.received(), 6);
        assert_eq!(guard.finish().unwrap(), b"abcdef");
    }

    #[test]
    fn total_equal_to_limit_is_accepted() {
        let mut guard = SizeGuard::new(4);
        assert_eq!(guard.push(Bytes::from_static(b"ab")), ChunkVerdict::Accepted);
        assert_eq!(guard.push(Bytes::from_static(b"cd")), ChunkVerdict::Accepted);
        assert!(!guard.is_exceeded());
        assert_eq!(guard.finish().unwrap().len(), 4);
    }

    #[test]
    fn one_byte_over_trips_and_releases_chunks() {
        let mut guard = SizeGuard::new(4);
        guard.push(Bytes::from_static(b"abcd"));
        assert_eq!(guard.retained_bytes(), 4);

        assert_eq!(guard.push(Bytes::from_static(b"e")), ChunkVerdict::Exceeded);
        assert!(guard.is_exceeded());
        assert_eq!(guard.retained_bytes(), 0);

        assert_eq!(guard.push(Bytes::from_static(b"f")), ChunkVerdict::Ignored);
        assert_eq!(guard.retained_bytes(), 0);
        assert_eq!(guard.finish(), Err(UploadErrorKind::FileTooLarge));
    }

    #[test]
    fn empty_part_is_a_zero_length_file() {
        let guard = SizeGuard::new(4);
        assert_eq!(guard.finish().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let mut guard = SizeGuard::new(16);
        guard.push(Bytes::from_static(b"abc"));
        guard.received += 1;
        assert_eq!(guard.finish(), Err(UploadErrorKind::MalformedMultipart));
    }
}
