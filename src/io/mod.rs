mod http;
mod local;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;

use async_trait::async_trait;
use std::io;

/// Trait for positioned reads from a feed bundle source.
///
/// Every read is absolute-offset; there is no shared cursor, so a single
/// source can serve multiple extractions without interference.
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Fails if the source cannot supply `buf.len()` bytes at that offset.
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Total size of the source in bytes.
    fn size(&self) -> u64;
}

/// In-memory bundle source.
///
/// Used when the caller already holds the archive bytes (and by the test
/// fixtures, which build minimal archives by hand).
pub struct MemoryReader {
    data: Vec<u8>,
}

impl MemoryReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<Vec<u8>> for MemoryReader {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

#[async_trait]
impl ReadAt for MemoryReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "offset out of range"))?;
        let end = start
            .checked_add(buf.len())
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of buffer")
            })?;
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_reader_positioned_read() {
        let reader = MemoryReader::new(b"abcdef".to_vec());
        let mut buf = [0u8; 3];
        reader.read_at(2, &mut buf).await.unwrap();
        assert_eq!(&buf, b"cde");
        assert_eq!(reader.size(), 6);
    }

    #[tokio::test]
    async fn memory_reader_rejects_short_read() {
        let reader = MemoryReader::new(b"abc".to_vec());
        let mut buf = [0u8; 4];
        assert!(reader.read_at(1, &mut buf).await.is_err());
    }
}
