//! Prefix reader over a byte source.
//!
//! Little-endian primitive reads plus chunked skipping, shared by the
//! decoder. The reader never seeks; everything moves strictly forward.

use ggprobe_core::{ByteSource, GgufDecodeError};

/// Upper bound on a single discard read.
const SKIP_CHUNK: usize = 64 * 1024;

pub(crate) struct PrefixReader<'a, S: ByteSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: ByteSource + ?Sized> PrefixReader<'a, S> {
    pub(crate) fn new(source: &'a mut S) -> Self {
        Self { source }
    }

    pub(crate) async fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), GgufDecodeError> {
        self.source.read_exact(buf).await.map_err(Into::into)
    }

    pub(crate) async fn read_u32(&mut self) -> Result<u32, GgufDecodeError> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf).await?;
        Ok(u32::from_le_bytes(buf))
    }

    pub(crate) async fn read_u64(&mut self) -> Result<u64, GgufDecodeError> {
        let mut buf = [0u8; 8];
        self.read_bytes(&mut buf).await?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Read `len` bytes as UTF-8 text.
    pub(crate) async fn read_utf8(&mut self, len: usize) -> Result<String, GgufDecodeError> {
        let mut buf = vec![0u8; len];
        self.read_bytes(&mut buf).await?;
        String::from_utf8(buf)
            .map_err(|_| GgufDecodeError::CorruptStream("invalid UTF-8 in metadata key".to_string()))
    }

    /// Discard `n` bytes by reading them in bounded chunks.
    pub(crate) async fn skip_bytes(&mut self, n: u64) -> Result<(), GgufDecodeError> {
        if n == 0 {
            return Ok(());
        }
        let chunk = usize::try_from(n).map_or(SKIP_CHUNK, |n| n.min(SKIP_CHUNK));
        let mut scratch = vec![0u8; chunk];
        let mut remaining = n;
        while remaining > 0 {
            let take = usize::try_from(remaining).map_or(scratch.len(), |r| r.min(scratch.len()));
            self.read_bytes(&mut scratch[..take]).await?;
            remaining -= take as u64;
        }
        Ok(())
    }

    pub(crate) fn position(&self) -> u64 {
        self.source.position()
    }
}
