//! Encode/decode of the trailing compressed-offset index (C2 — Index Codec).
//!
//! Pure: these functions only ever see byte buffers the caller has already
//! read off disk (or is about to write). `Reader` is responsible for seeking
//! to the index and reading `index_size`, then exactly `index_size` entries;
//! this module only encodes and validates what it is handed.

use crate::error::{Result, ZeexError};

/// Serialize `entries` as `index_size:u32` followed by each entry as `u64` LE,
/// in the same order they appear in `entries`.
pub fn encode(entries: &[u64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + entries.len() * 8);
    buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for e in entries {
        buf.extend_from_slice(&e.to_le_bytes());
    }
    buf
}

/// Decode `count` little-endian `u64` entries from `buf`.
///
/// `buf` must be exactly `count * 8` bytes; this is an internal invariant
/// enforced by the caller having read exactly that many bytes off disk, not
/// a recoverable format error, so a length mismatch panics like a slice
/// index would.
pub fn decode_entries(buf: &[u8], count: u32) -> Vec<u64> {
    assert_eq!(buf.len(), count as usize * 8, "index buffer length mismatch");
    buf.chunks_exact(8)
        .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

/// Validate the index invariants from spec §3:
/// - `entries` is strictly increasing except `entries[0] == 0`.
/// - `entries[k] <= cdata_length` for all k.
/// - `entries[N-1] < cdata_length` when `N >= 1`.
pub fn validate(entries: &[u64], cdata_length: u64) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    if entries[0] != 0 {
        return Err(ZeexError::MalformedIndex(format!(
            "entries[0] must be 0, got {}",
            entries[0]
        )));
    }
    for k in 1..entries.len() {
        if entries[k] <= entries[k - 1] {
            return Err(ZeexError::MalformedIndex(format!(
                "entries[{}] = {} must be strictly greater than entries[{}] = {}",
                k,
                entries[k],
                k - 1,
                entries[k - 1]
            )));
        }
    }
    for (k, &e) in entries.iter().enumerate() {
        if e > cdata_length {
            return Err(ZeexError::MalformedIndex(format!(
                "entries[{}] = {} exceeds cdata_length {}",
                k, e, cdata_length
            )));
        }
    }
    let last = entries[entries.len() - 1];
    if last >= cdata_length {
        return Err(ZeexError::MalformedIndex(format!(
            "entries[N-1] = {} must be strictly less than cdata_length {}",
            last, cdata_length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let entries = vec![0u64, 10, 25, 40];
        let bytes = encode(&entries);
        let count = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        assert_eq!(count, 4);
        let decoded = decode_entries(&bytes[4..], count);
        assert_eq!(decoded, entries);
    }

    #[test]
    fn validate_accepts_well_formed_index() {
        let entries = vec![0u64, 10, 25, 40];
        assert!(validate(&entries, 50).is_ok());
    }

    #[test]
    fn validate_rejects_non_monotonic() {
        let entries = vec![0u64, 10, 10, 40];
        assert!(validate(&entries, 50).is_err());
    }

    #[test]
    fn validate_rejects_entries_overrunning_cdata_length() {
        let entries = vec![0u64, 10, 25, 40];
        assert!(validate(&entries, 40).is_err());
    }

    #[test]
    fn validate_rejects_nonzero_first_entry() {
        let entries = vec![5u64, 10, 25];
        assert!(validate(&entries, 50).is_err());
    }

    #[test]
    fn validate_accepts_empty_index() {
        assert!(validate(&[], 0).is_ok());
    }
}
