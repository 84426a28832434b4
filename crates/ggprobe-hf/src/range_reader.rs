//! Lazy range-fetching reader over a remote file.
//!
//! Gives the decoder a plain read-exact contract without materializing the
//! remote object: bytes are fetched in fixed-size chunks on demand and
//! discarded once consumed.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use ggprobe_core::{ByteSource, ByteSourceError};
use url::Url;

use crate::http::HttpBackend;
use crate::models::RangeResponse;

/// Forward-only buffered reader over ranged HTTP fetches.
///
/// Owns its buffer and its backend handle; one instance serves exactly one
/// decode operation. The network fetch inside [`ByteSource::read_exact`] is
/// the only suspension point, so an in-flight decode can be abandoned there
/// without corrupting anything shared.
pub struct LazyRangeReader<B: HttpBackend> {
    backend: Arc<B>,
    url: Url,
    chunk_size: u64,
    /// Buffered bytes covering `[buffer_start, buffer_start + buffer.len())`.
    buffer: Vec<u8>,
    buffer_start: u64,
    /// Logical cursor; never moves backwards.
    pos: u64,
    exhausted: bool,
}

impl<B: HttpBackend> LazyRangeReader<B> {
    /// Create a reader positioned at the start of the resource.
    #[must_use]
    pub fn new(backend: Arc<B>, url: Url, chunk_size: u64) -> Self {
        Self {
            backend,
            url,
            chunk_size: chunk_size.max(1),
            buffer: Vec::new(),
            buffer_start: 0,
            pos: 0,
            exhausted: false,
        }
    }

    fn buffered_tail(&self) -> u64 {
        self.buffer_start + self.buffer.len() as u64
    }

    fn available(&self) -> u64 {
        self.buffered_tail() - self.pos
    }

    /// Ensure at least `needed` bytes are buffered past the cursor.
    async fn fill(&mut self, needed: u64) -> Result<(), ByteSourceError> {
        while self.available() < needed {
            if self.exhausted {
                return Err(ByteSourceError::UnexpectedEof {
                    position: self.buffered_tail(),
                });
            }

            // Drop everything already consumed before growing the buffer.
            let consumed = usize::try_from(self.pos - self.buffer_start)
                .map_err(|_| ByteSourceError::Io("cursor outran addressable memory".to_string()))?;
            if consumed > 0 {
                self.buffer.drain(..consumed);
                self.buffer_start = self.pos;
            }

            let fetch_start = self.buffered_tail();
            let response = self
                .backend
                .fetch_range(&self.url, fetch_start, self.chunk_size)
                .await
                .map_err(ByteSourceError::from)?;
            let chunk = slice_requested(response, fetch_start, self.chunk_size)?;
            if chunk.is_empty() {
                self.exhausted = true;
            } else {
                self.buffer.extend_from_slice(&chunk);
            }
        }
        Ok(())
    }
}

/// Cut a response down to the requested sub-range.
///
/// Servers may ignore the range request and answer with the full resource
/// from offset zero; the requested window is sliced out here. A response
/// starting past the requested offset is a transport error.
fn slice_requested(
    response: RangeResponse,
    start: u64,
    len: u64,
) -> Result<Bytes, ByteSourceError> {
    if response.start == start {
        return Ok(response.body);
    }
    if response.start > start {
        return Err(ByteSourceError::Network(format!(
            "server answered from offset {} for a fetch at {start}",
            response.start
        )));
    }

    let skip = start - response.start;
    let body_len = response.body.len() as u64;
    if skip >= body_len {
        return Ok(Bytes::new());
    }
    let begin = usize::try_from(skip)
        .map_err(|_| ByteSourceError::Network("range window exceeds addressable memory".to_string()))?;
    let end = usize::try_from(skip.saturating_add(len).min(body_len))
        .map_err(|_| ByteSourceError::Network("range window exceeds addressable memory".to_string()))?;
    Ok(response.body.slice(begin..end))
}

#[async_trait]
impl<B: HttpBackend> ByteSource for LazyRangeReader<B> {
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ByteSourceError> {
        self.fill(buf.len() as u64).await?;
        let offset = usize::try_from(self.pos - self.buffer_start)
            .map_err(|_| ByteSourceError::Io("cursor outran addressable memory".to_string()))?;
        buf.copy_from_slice(&self.buffer[offset..offset + buf.len()]);
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;

    fn reader(backend: FakeBackend, chunk_size: u64) -> LazyRangeReader<FakeBackend> {
        let url = Url::parse("https://example.com/repo/resolve/main/model.gguf").unwrap();
        LazyRangeReader::new(Arc::new(backend), url, chunk_size)
    }

    fn body() -> Vec<u8> {
        (0u8..=99).collect()
    }

    #[tokio::test]
    async fn test_reads_across_chunk_boundaries() {
        let backend = FakeBackend::new().with_file("model.gguf", body());
        let mut reader = reader(backend, 16);

        let mut first = [0u8; 8];
        reader.read_exact(&mut first).await.unwrap();
        assert_eq!(first, [0, 1, 2, 3, 4, 5, 6, 7]);

        // Spans the first chunk's tail and forces two more fetches.
        let mut second = [0u8; 40];
        reader.read_exact(&mut second).await.unwrap();
        assert_eq!(second[0], 8);
        assert_eq!(second[39], 47);
        assert_eq!(reader.position(), 48);
    }

    #[tokio::test]
    async fn test_fetches_fixed_chunks_from_buffer_tail() {
        let backend = FakeBackend::new().with_file("model.gguf", body());
        let mut reader = reader(backend, 16);

        let mut buf = [0u8; 40];
        reader.read_exact(&mut buf).await.unwrap();

        let ranges = reader.backend.fetched_ranges();
        assert_eq!(ranges, vec![(0, 16), (16, 16), (32, 16)]);
    }

    #[tokio::test]
    async fn test_exact_read_to_end_succeeds() {
        let backend = FakeBackend::new().with_file("model.gguf", body());
        let mut reader = reader(backend, 64);

        let mut buf = [0u8; 100];
        reader.read_exact(&mut buf).await.unwrap();
        assert_eq!(buf[99], 99);
    }

    #[tokio::test]
    async fn test_read_past_end_is_eof() {
        let backend = FakeBackend::new().with_file("model.gguf", body());
        let mut reader = reader(backend, 64);

        let mut buf = [0u8; 101];
        assert!(matches!(
            reader.read_exact(&mut buf).await,
            Err(ByteSourceError::UnexpectedEof { position: 100 })
        ));
    }

    #[tokio::test]
    async fn test_tolerates_range_ignoring_server() {
        let backend = FakeBackend::new()
            .with_file("model.gguf", body())
            .with_range_ignored();
        let mut reader = reader(backend, 16);

        let mut first = [0u8; 20];
        reader.read_exact(&mut first).await.unwrap();
        assert_eq!(first[19], 19);

        let mut second = [0u8; 20];
        reader.read_exact(&mut second).await.unwrap();
        assert_eq!(second[0], 20);
        assert_eq!(second[19], 39);
    }

    #[tokio::test]
    async fn test_missing_file_surfaces_as_network_error() {
        let backend = FakeBackend::new();
        let mut reader = reader(backend, 16);

        let mut buf = [0u8; 4];
        assert!(matches!(
            reader.read_exact(&mut buf).await,
            Err(ByteSourceError::Network(_))
        ));
    }

    #[test]
    fn test_slice_requested_full_resource_response() {
        let response = RangeResponse {
            body: Bytes::from_static(b"0123456789"),
            start: 0,
            total: None,
        };
        let sliced = slice_requested(response, 4, 3).unwrap();
        assert_eq!(&sliced[..], b"456");
    }

    #[test]
    fn test_slice_requested_past_end_is_empty() {
        let response = RangeResponse {
            body: Bytes::from_static(b"0123"),
            start: 0,
            total: None,
        };
        assert!(slice_requested(response, 10, 3).unwrap().is_empty());
    }

    #[test]
    fn test_slice_requested_wrong_offset_is_error() {
        let response = RangeResponse {
            body: Bytes::from_static(b"0123"),
            start: 8,
            total: None,
        };
        assert!(slice_requested(response, 4, 4).is_err());
    }
}
