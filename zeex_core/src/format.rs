//! Fixed-layout serialization of the 30-byte ZEEX header (C1 — Header Codec).
//!
//! The codec is pure: no I/O happens here. Callers own reading/writing the
//! bytes; this module only encodes/decodes and classifies them.

use crate::error::{Result, ZeexError};

/// Magic bytes of a finalized file.
pub const MAGIC_FINALIZED: &[u8; 4] = b"ZEEX";
/// Magic bytes of an unfinished (placeholder) file.
pub const MAGIC_UNFINISHED: &[u8; 4] = b"ZZXX";

/// Current format version implemented by this codec.
pub const CURRENT_VERSION: u16 = 1;

/// Fixed size of the header in bytes.
///   magic[4] + version:u16 + block_size:u64 + data_length:u64 + cdata_length:u64
///   = 4 + 2 + 8 + 8 + 8 = 30
pub const HEADER_SIZE: usize = 30;

/// Default block size used by `Writer::new` when none is given: 20 MiB.
pub const DEFAULT_BLOCK_SIZE: u64 = 20 * 1024 * 1024;

/// Size of the `index_size` field of the trailing index (C2).
pub const INDEX_SIZE_FIELD: usize = 4;
/// Size of each index entry.
pub const INDEX_ENTRY_SIZE: usize = 8;

/// How the header's magic classifies the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicState {
    /// `ZEEX` — a complete, readable file.
    Finalized,
    /// `ZZXX` — the writer never reached `close()`.
    Unfinished,
    /// Anything else.
    Foreign,
}

/// Decoded representation of the 30-byte header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    /// Uncompressed block size in bytes. Constant across the file, > 0.
    pub block_size: u64,
    /// Total uncompressed payload length.
    pub data_length: u64,
    /// Total size of the compressed data region immediately following the header.
    pub cdata_length: u64,
}

impl Header {
    /// Build the placeholder header written at `Writer::new` time: magic
    /// `ZZXX`, current version, all size fields zero except `block_size`.
    pub fn placeholder(block_size: u64) -> Self {
        Header {
            version: CURRENT_VERSION,
            block_size,
            data_length: 0,
            cdata_length: 0,
        }
    }

    /// Classify a raw 4-byte magic.
    pub fn classify_magic(magic: &[u8; 4]) -> MagicState {
        if magic == MAGIC_FINALIZED {
            MagicState::Finalized
        } else if magic == MAGIC_UNFINISHED {
            MagicState::Unfinished
        } else {
            MagicState::Foreign
        }
    }

    /// Serialize to exactly `HEADER_SIZE` bytes, using `finalized` to choose
    /// the magic (`ZEEX` when true, `ZZXX` when false).
    pub fn to_bytes(&self, finalized: bool) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(if finalized { MAGIC_FINALIZED } else { MAGIC_UNFINISHED });
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..14].copy_from_slice(&self.block_size.to_le_bytes());
        buf[14..22].copy_from_slice(&self.data_length.to_le_bytes());
        buf[22..30].copy_from_slice(&self.cdata_length.to_le_bytes());
        buf
    }

    /// Decode a header buffer, validating magic, version and the
    /// caller-observed file size consistency of `cdata_length`.
    ///
    /// `observed_file_len`, when `Some`, is used to reject a `cdata_length`
    /// that would overrun the file (header + compressed region must fit).
    pub fn from_bytes(buf: &[u8; HEADER_SIZE], observed_file_len: Option<u64>) -> Result<Self> {
        let magic: [u8; 4] = buf[0..4].try_into().unwrap();
        match Self::classify_magic(&magic) {
            MagicState::Finalized => {}
            MagicState::Unfinished => return Err(ZeexError::Unfinished),
            MagicState::Foreign => return Err(ZeexError::UnknownFormat),
        }

        let version = u16::from_le_bytes(buf[4..6].try_into().unwrap());
        if version > CURRENT_VERSION {
            return Err(ZeexError::IncompatibleVersion {
                found: version,
                max: CURRENT_VERSION,
            });
        }

        let block_size = u64::from_le_bytes(buf[6..14].try_into().unwrap());
        if block_size == 0 {
            return Err(ZeexError::InvalidArgument("block_size must be > 0".into()));
        }

        let data_length = u64::from_le_bytes(buf[14..22].try_into().unwrap());
        let cdata_length = u64::from_le_bytes(buf[22..30].try_into().unwrap());

        if let Some(file_len) = observed_file_len {
            let needed = HEADER_SIZE as u64 + cdata_length;
            if needed > file_len {
                return Err(ZeexError::MalformedIndex(format!(
                    "cdata_length {} implies compressed region ends at {}, past observed file length {}",
                    cdata_length, needed, file_len
                )));
            }
        }

        Ok(Header {
            version,
            block_size,
            data_length,
            cdata_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_finalized() {
        let h = Header {
            version: 1,
            block_size: 4096,
            data_length: 12345,
            cdata_length: 6789,
        };
        let bytes = h.to_bytes(true);
        assert_eq!(bytes.len(), HEADER_SIZE);
        let decoded = Header::from_bytes(&bytes, None).unwrap();
        assert_eq!(decoded, h);
    }

    #[test]
    fn unfinished_is_rejected() {
        let h = Header::placeholder(4096);
        let bytes = h.to_bytes(false);
        let err = Header::from_bytes(&bytes, None).unwrap_err();
        assert!(matches!(err, ZeexError::Unfinished));
    }

    #[test]
    fn foreign_magic_is_rejected() {
        let mut bytes = Header::placeholder(4096).to_bytes(true);
        bytes[0] = b'z'; // flip one byte of the magic
        let err = Header::from_bytes(&bytes, None).unwrap_err();
        assert!(matches!(err, ZeexError::UnknownFormat));
    }

    #[test]
    fn version_too_new_is_rejected() {
        let mut h = Header::placeholder(4096);
        h.version = CURRENT_VERSION + 1;
        let bytes = h.to_bytes(true);
        let err = Header::from_bytes(&bytes, None).unwrap_err();
        assert!(matches!(err, ZeexError::IncompatibleVersion { .. }));
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let h = Header {
            version: 1,
            block_size: 0,
            data_length: 0,
            cdata_length: 0,
        };
        let bytes = h.to_bytes(true);
        let err = Header::from_bytes(&bytes, None).unwrap_err();
        assert!(matches!(err, ZeexError::InvalidArgument(_)));
    }

    #[test]
    fn cdata_length_beyond_observed_file_len_is_malformed() {
        let h = Header {
            version: 1,
            block_size: 4096,
            data_length: 100,
            cdata_length: 1_000_000,
        };
        let bytes = h.to_bytes(true);
        let err = Header::from_bytes(&bytes, Some(HEADER_SIZE as u64 + 10)).unwrap_err();
        assert!(matches!(err, ZeexError::MalformedIndex(_)));
    }
}
