//! # gtfsgrab
//!
//! Pull tabular feed files out of a GTFS transit bundle.
//!
//! A GTFS feed is a ZIP archive of CSV text files. This crate reads the
//! archive itself (End of Central Directory search, central directory
//! walk, stored/deflate extraction) and parses the extracted text with a
//! permissive CSV parser tuned for the sloppiness of real feeds. Bundles
//! can come from the local filesystem, an in-memory buffer, or a remote
//! HTTP server, where Range requests avoid downloading the whole archive.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gtfsgrab::{ArchiveReader, LocalFileReader, tabular};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = Arc::new(LocalFileReader::new(std::path::Path::new("feed.zip"))?);
//!     let archive = ArchiveReader::new(reader);
//!
//!     let members = archive.extract(&["calendar.txt".to_string()]).await?;
//!     if let Some(text) = members.get("calendar.txt") {
//!         for record in tabular::parse(text) {
//!             println!("{:?}", record.get("service_id"));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod io;
pub mod tabular;

pub use archive::{ArchiveEntry, ArchiveError, ArchiveReader, CompressionMethod};
pub use cli::Cli;
pub use io::{HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
pub use tabular::CsvRecord;
