use std::io;
use thiserror::Error;

/// Errors raised while reading a feed bundle archive.
///
/// Every variant is fatal to the extraction call that raised it; there is
/// no partial or best-effort mode. Structural failures carry the absolute
/// byte offset of the check that failed so a bad bundle can be diagnosed
/// without a hex editor.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// No end-of-central-directory signature in the archive tail. The
    /// bundle is truncated, or not a ZIP archive at all.
    #[error("no end-of-central-directory signature in the final {searched} bytes; not a ZIP archive")]
    EocdNotFound { searched: u64 },

    /// A central directory record did not start with its signature.
    #[error("bad central directory signature at byte offset {offset:#x}")]
    CentralDirectoryCorrupt { offset: u64 },

    /// An entry's local file header offset did not point at a local
    /// header signature.
    #[error("bad local file header signature at byte offset {offset:#x}")]
    LocalHeaderCorrupt { offset: u64 },

    /// Entry compressed with something other than stored or deflate.
    #[error("unsupported compression method {0} (only stored and deflate are handled)")]
    UnsupportedMethod(u16),

    /// Extracted member bytes are not valid UTF-8 text.
    #[error("member `{name}` is not valid UTF-8")]
    Decode {
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// I/O failure from the underlying bundle source.
    #[error("I/O error reading bundle")]
    Io {
        #[from]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
