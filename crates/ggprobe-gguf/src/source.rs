//! Local byte sources feeding the decoder.
//!
//! The remote range-fetching source lives in `ggprobe-hf`; these two cover
//! files already on disk and buffers already in memory.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use ggprobe_core::{ByteSource, ByteSourceError};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Sequential byte source over a local file.
pub struct FileSource {
    file: File,
    pos: u64,
}

impl FileSource {
    /// Open a local file for forward-only reading.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self { file, pos: 0 })
    }
}

#[async_trait]
impl ByteSource for FileSource {
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ByteSourceError> {
        match self.file.read_exact(buf).await {
            Ok(_) => {
                self.pos += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Err(ByteSourceError::UnexpectedEof { position: self.pos })
            }
            Err(err) => Err(ByteSourceError::Io(err.to_string())),
        }
    }

    fn position(&self) -> u64 {
        self.pos
    }
}

/// Byte source over an in-memory buffer.
///
/// For callers that already hold a file prefix, and for tests.
pub struct MemorySource {
    data: Vec<u8>,
    pos: usize,
}

impl MemorySource {
    /// Wrap a buffer as a byte source.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ByteSourceError> {
        let Some(end) = self.pos.checked_add(buf.len()) else {
            return Err(ByteSourceError::UnexpectedEof {
                position: self.data.len() as u64,
            });
        };
        if end > self.data.len() {
            return Err(ByteSourceError::UnexpectedEof {
                position: self.data.len() as u64,
            });
        }
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}
