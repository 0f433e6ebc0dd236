use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

use flate2::read::DeflateDecoder;
use tracing::debug;

use crate::io::ReadAt;

use super::error::{ArchiveError, Result};
use super::layout::{ArchiveEntry, CompressionMethod};
use super::parser::ArchiveParser;

/// High-level, read-only view of a feed bundle.
///
/// Members are addressed by basename, case-insensitively: requesting
/// `calendar.txt` finds `gtfs/CALENDAR.TXT`. When the same basename exists
/// in several directories, the first one encountered in central directory
/// order wins.
pub struct ArchiveReader<R: ReadAt> {
    parser: ArchiveParser<R>,
}

impl<R: ReadAt> ArchiveReader<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ArchiveParser::new(reader),
        }
    }

    /// List every entry in the bundle, in archive order.
    pub async fn entries(&self) -> Result<Vec<ArchiveEntry>> {
        self.parser.list_entries().await
    }

    /// Extract the requested members as decoded UTF-8 text.
    ///
    /// Returns a map from lowercased requested basename to member text.
    /// A requested name with no matching entry is simply absent from the
    /// map; whether that is an error is the caller's call. Any structural
    /// failure aborts the whole extraction with no partial output.
    pub async fn extract(&self, wanted: &[String]) -> Result<BTreeMap<String, String>> {
        let wanted: Vec<String> = wanted.iter().map(|n| n.to_ascii_lowercase()).collect();
        let entries = self.parser.list_entries().await?;

        let mut members = BTreeMap::new();
        for entry in &entries {
            if entry.is_directory() {
                continue;
            }
            let base = entry.basename().to_ascii_lowercase();
            if !wanted.contains(&base) || members.contains_key(&base) {
                continue;
            }

            let bytes = self.read_member(entry).await?;
            let text = String::from_utf8(bytes).map_err(|source| ArchiveError::Decode {
                name: entry.name.clone(),
                source,
            })?;
            debug!(member = %entry.name, bytes = text.len(), "extracted member");
            members.insert(base, text);
        }

        Ok(members)
    }

    /// Read and decompress one entry's data.
    async fn read_member(&self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        // Reject unknown methods before touching the data.
        if let CompressionMethod::Unsupported(code) = entry.method {
            return Err(ArchiveError::UnsupportedMethod(code));
        }

        let data_offset = self.parser.data_offset(entry).await?;
        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser.reader().read_at(data_offset, &mut raw).await?;

        match entry.method {
            CompressionMethod::Stored => Ok(raw),
            CompressionMethod::Deflate => {
                // ZIP method 8 is headerless deflate, no zlib wrapper.
                let mut inflated = Vec::with_capacity(entry.uncompressed_size as usize);
                DeflateDecoder::new(raw.as_slice()).read_to_end(&mut inflated)?;
                Ok(inflated)
            }
            CompressionMethod::Unsupported(code) => Err(ArchiveError::UnsupportedMethod(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::testutil::{ArchiveBuilder, DEFLATE, STORED, deflate};
    use crate::io::MemoryReader;

    fn reader_for(bytes: Vec<u8>) -> ArchiveReader<MemoryReader> {
        ArchiveReader::new(Arc::new(MemoryReader::new(bytes)))
    }

    fn want(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn stored_member_round_trips_exactly() {
        let content = "service_id,monday\nS1,1\n";
        let bytes = ArchiveBuilder::new()
            .entry("calendar.txt", STORED, content.as_bytes(), None)
            .build();
        let members = reader_for(bytes)
            .extract(&want(&["calendar.txt"]))
            .await
            .unwrap();
        assert_eq!(members["calendar.txt"], content);
    }

    #[tokio::test]
    async fn deflate_member_round_trips_exactly() {
        let content = "stop_id,stop_name\nS1,Central\nS2,Harbor\n".repeat(40);
        let compressed = deflate(content.as_bytes());
        assert!(compressed.len() < content.len());
        let bytes = ArchiveBuilder::new()
            .entry("stops.txt", DEFLATE, &compressed, Some(content.len() as u32))
            .build();
        let members = reader_for(bytes)
            .extract(&want(&["stops.txt"]))
            .await
            .unwrap();
        assert_eq!(members["stops.txt"], content);
    }

    #[tokio::test]
    async fn basename_match_is_case_insensitive() {
        let bytes = ArchiveBuilder::new()
            .entry("gtfs/CALENDAR.TXT", STORED, b"service_id\nS1\n", None)
            .build();
        let members = reader_for(bytes)
            .extract(&want(&["calendar.txt"]))
            .await
            .unwrap();
        assert_eq!(members["calendar.txt"], "service_id\nS1\n");
    }

    #[tokio::test]
    async fn first_matching_basename_wins() {
        let bytes = ArchiveBuilder::new()
            .entry("a/stops.txt", STORED, b"first", None)
            .entry("b/stops.txt", STORED, b"second", None)
            .build();
        let members = reader_for(bytes)
            .extract(&want(&["stops.txt"]))
            .await
            .unwrap();
        assert_eq!(members["stops.txt"], "first");
    }

    #[tokio::test]
    async fn missing_member_is_absent_not_an_error() {
        let bytes = ArchiveBuilder::new()
            .entry("stops.txt", STORED, b"stop_id\n", None)
            .build();
        let members = reader_for(bytes)
            .extract(&want(&["stops.txt", "fares.txt"]))
            .await
            .unwrap();
        assert!(members.contains_key("stops.txt"));
        assert!(!members.contains_key("fares.txt"));
    }

    #[tokio::test]
    async fn unsupported_method_yields_no_partial_output() {
        // Method 12 is BZIP2.
        let bytes = ArchiveBuilder::new()
            .entry("routes.txt", STORED, b"route_id\nR1\n", None)
            .entry("shapes.txt", 12, b"not really bzip2", Some(16))
            .build();
        let result = reader_for(bytes)
            .extract(&want(&["routes.txt", "shapes.txt"]))
            .await;
        assert!(matches!(result, Err(ArchiveError::UnsupportedMethod(12))));
    }

    #[tokio::test]
    async fn invalid_utf8_member_fails_to_decode() {
        let bytes = ArchiveBuilder::new()
            .entry("stops.txt", STORED, &[0x73, 0x74, 0xff, 0xfe], None)
            .build();
        let result = reader_for(bytes).extract(&want(&["stops.txt"])).await;
        assert!(matches!(result, Err(ArchiveError::Decode { .. })));
    }

    #[tokio::test]
    async fn directory_entries_are_skipped() {
        let bytes = ArchiveBuilder::new()
            .entry("gtfs/", STORED, b"", None)
            .entry("gtfs/trips.txt", STORED, b"trip_id\nT1\n", None)
            .build();
        let members = reader_for(bytes)
            .extract(&want(&["trips.txt"]))
            .await
            .unwrap();
        assert_eq!(members["trips.txt"], "trip_id\nT1\n");
    }
}
