//! Feed bundle archive reading.
//!
//! A GTFS bundle is an ordinary ZIP archive. This module reads it without
//! an archive library: locate the End of Central Directory record in the
//! file tail, walk the central directory for entry metadata, then resolve
//! each wanted entry's local file header and inflate its data.
//!
//! Organization mirrors the read path:
//!
//! - [`layout`]: binary structure constants and fixed-offset field reads
//! - [`parser`]: EOCD search, central directory walk, data offset resolution
//! - [`reader`]: member selection, decompression, UTF-8 decoding
//!
//! Supported: stored (method 0) and deflate (method 8) entries. Out of
//! scope: writing archives, ZIP64, encryption, multi-disk archives.

mod error;
mod layout;
mod parser;
mod reader;

pub use error::{ArchiveError, Result};
pub use layout::{ArchiveEntry, CompressionMethod, EocdRecord};
pub use parser::ArchiveParser;
pub use reader::ArchiveReader;
