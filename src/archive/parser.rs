//! Low-level bundle structure parsing.
//!
//! ZIP archives are read from the end: find the End of Central Directory
//! (EOCD) in the file tail, read the central directory it points to, then
//! resolve each entry's local file header to find its data. Every access
//! is an absolute-offset read through [`ReadAt`], which is what makes the
//! HTTP Range source practical for large hosted feeds.

use std::sync::Arc;
use tracing::debug;

use crate::io::ReadAt;

use super::error::{ArchiveError, Result};
use super::layout::*;

/// Low-level parser for the three ZIP structures the reader consumes.
///
/// Generic over the source so local files, in-memory buffers, and HTTP
/// Range sources all go through the same code. Typically used through
/// [`ArchiveReader`](super::ArchiveReader) rather than directly.
pub struct ArchiveParser<R: ReadAt> {
    reader: Arc<R>,
    size: u64,
}

impl<R: ReadAt> ArchiveParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Locate and parse the End of Central Directory record.
    ///
    /// Reads the final `min(size, 65557)` bytes and scans backward from
    /// the highest offset for the signature. The first hit wins; a decoy
    /// signature inside an archive comment is accepted by design, since
    /// archives produced by real tools never trigger the ambiguity.
    pub async fn find_eocd(&self) -> Result<EocdRecord> {
        let tail_len = EOCD_SEARCH_WINDOW.min(self.size);
        if (tail_len as usize) < EOCD_SIZE {
            return Err(ArchiveError::EocdNotFound { searched: tail_len });
        }

        let mut tail = vec![0u8; tail_len as usize];
        self.reader.read_at(self.size - tail_len, &mut tail).await?;

        for i in (0..=tail.len() - EOCD_SIZE).rev() {
            if &tail[i..i + 4] == EOCD_SIGNATURE {
                let eocd = EocdRecord::from_bytes(&tail[i..i + EOCD_SIZE]);
                debug!(
                    cd_offset = eocd.cd_offset,
                    cd_size = eocd.cd_size,
                    total_entries = eocd.total_entries,
                    "located end of central directory"
                );
                return Ok(eocd);
            }
        }

        Err(ArchiveError::EocdNotFound { searched: tail_len })
    }

    /// Walk the central directory and return every entry in archive order.
    pub async fn list_entries(&self) -> Result<Vec<ArchiveEntry>> {
        let eocd = self.find_eocd().await?;

        let mut cd = vec![0u8; eocd.cd_size as usize];
        self.reader.read_at(eocd.cd_offset as u64, &mut cd).await?;

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        let mut pos = 0usize;

        // Fewer than 46 bytes left ends the walk; a full record window
        // with a bad signature means the directory is corrupt.
        while pos + CENTRAL_HEADER_SIZE <= cd.len() {
            if &cd[pos..pos + 4] != CENTRAL_HEADER_SIGNATURE {
                return Err(ArchiveError::CentralDirectoryCorrupt {
                    offset: eocd.cd_offset as u64 + pos as u64,
                });
            }

            let method = u16_at(&cd[pos..], 10);
            let compressed_size = u32_at(&cd[pos..], 20);
            let uncompressed_size = u32_at(&cd[pos..], 24);
            let name_len = u16_at(&cd[pos..], 28) as usize;
            let extra_len = u16_at(&cd[pos..], 30) as usize;
            let comment_len = u16_at(&cd[pos..], 32) as usize;
            let local_header_offset = u32_at(&cd[pos..], 42);

            let name_end = pos + CENTRAL_HEADER_SIZE + name_len;
            if name_end > cd.len() {
                return Err(ArchiveError::CentralDirectoryCorrupt {
                    offset: eocd.cd_offset as u64 + pos as u64,
                });
            }
            let name =
                String::from_utf8_lossy(&cd[pos + CENTRAL_HEADER_SIZE..name_end]).into_owned();

            entries.push(ArchiveEntry {
                name,
                method: CompressionMethod::from_u16(method),
                compressed_size,
                uncompressed_size,
                local_header_offset,
            });

            pos = name_end + extra_len + comment_len;
        }

        debug!(entries = entries.len(), "walked central directory");
        Ok(entries)
    }

    /// Resolve the absolute offset of an entry's compressed data.
    ///
    /// The local file header carries its own name/extra lengths, which
    /// may disagree with the central directory copy; the data offset must
    /// be computed from the local values.
    pub async fn data_offset(&self, entry: &ArchiveEntry) -> Result<u64> {
        let header_offset = entry.local_header_offset as u64;
        let mut header = [0u8; LOCAL_HEADER_SIZE];
        self.reader.read_at(header_offset, &mut header).await?;

        if &header[0..4] != LOCAL_HEADER_SIGNATURE {
            return Err(ArchiveError::LocalHeaderCorrupt {
                offset: header_offset,
            });
        }

        let name_len = u16_at(&header, 26) as u64;
        let extra_len = u16_at(&header, 28) as u64;

        Ok(header_offset + LOCAL_HEADER_SIZE as u64 + name_len + extra_len)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
