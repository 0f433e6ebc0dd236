//! Binary layout of the ZIP structures the reader consumes.
//!
//! All integers are little-endian. Field access is written as explicit
//! fixed-offset reads over a length-checked slice so each offset can be
//! audited against the format tables.

use byteorder::{ByteOrder, LittleEndian};

/// End of Central Directory signature (`PK\x05\x06`).
pub const EOCD_SIGNATURE: &[u8] = b"PK\x05\x06";
/// Fixed EOCD size, excluding the trailing comment.
pub const EOCD_SIZE: usize = 22;
/// Largest possible EOCD footprint: 22 fixed bytes plus a 65535-byte comment.
pub const EOCD_SEARCH_WINDOW: u64 = EOCD_SIZE as u64 + 65_535;

/// Central Directory File Header signature (`PK\x01\x02`).
pub const CENTRAL_HEADER_SIGNATURE: &[u8] = b"PK\x01\x02";
/// Fixed central directory record size, excluding name/extra/comment.
pub const CENTRAL_HEADER_SIZE: usize = 46;

/// Local File Header signature (`PK\x03\x04`).
pub const LOCAL_HEADER_SIGNATURE: &[u8] = b"PK\x03\x04";
/// Fixed local file header size, excluding name/extra.
pub const LOCAL_HEADER_SIZE: usize = 30;

/// Read a u16 at a fixed offset. Caller has already length-checked `buf`.
pub(crate) fn u16_at(buf: &[u8], offset: usize) -> u16 {
    LittleEndian::read_u16(&buf[offset..offset + 2])
}

/// Read a u32 at a fixed offset. Caller has already length-checked `buf`.
pub(crate) fn u32_at(buf: &[u8], offset: usize) -> u32 {
    LittleEndian::read_u32(&buf[offset..offset + 4])
}

/// ZIP compression methods the reader knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unsupported(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unsupported(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unsupported(v) => *v,
        }
    }
}

/// The slice of the End of Central Directory record this reader uses.
#[derive(Debug, Clone, Copy)]
pub struct EocdRecord {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EocdRecord {
    /// Parse from a 22-byte window whose signature has already matched.
    ///
    /// Layout: total entry count @+10 (u16), central directory size @+12
    /// (u32), central directory offset @+16 (u32).
    pub fn from_bytes(data: &[u8]) -> Self {
        debug_assert!(data.len() >= EOCD_SIZE);
        Self {
            total_entries: u16_at(data, 10),
            cd_size: u32_at(data, 12),
            cd_offset: u32_at(data, 16),
        }
    }
}

/// One member of the bundle, as described by its central directory record.
///
/// Immutable once parsed; valid only for the archive session it came from.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub local_header_offset: u32,
}

impl ArchiveEntry {
    /// Final path component of the member name.
    ///
    /// Feed publishers sometimes nest the tabular files one directory
    /// deep, so members are addressed by basename.
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Directory entries end with `/` and carry no data.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}
