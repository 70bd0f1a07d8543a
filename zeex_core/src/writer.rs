//! Streaming Writer (C3).
//!
//! # Write contract
//! Call [`Writer::write`] any number of times with arbitrary-sized byte
//! slices; complete blocks are compressed and flushed as soon as enough
//! bytes have accumulated. Call [`Writer::finish`] to flush the residual
//! tail block, append the index, and seal the file by rewriting the header
//! with its final `ZEEX` magic and sizes.
//!
//! # Format layout written
//! ```text
//! [HEADER: 30 bytes, magic ZZXX placeholder]
//! [BLOCK 0] [BLOCK 1] ... [BLOCK N-1]     <- independent LZMA frames
//! [INDEX: index_size:u32 + N * u64 entries]
//! <- seek back to 0, overwrite header with magic ZEEX and final sizes
//! ```
//!
//! `finish` consumes `self` by value: a `Writer` that is merely dropped
//! without calling `finish` leaves the sink with its placeholder `ZZXX`
//! header, which is exactly the recovery signal spec'd for a reader to
//! reject later (spec §5).

use std::io::{Seek, SeekFrom, Write};

use crate::codec::Codec;
use crate::error::{Result, ZeexError};
use crate::format::{Header, DEFAULT_BLOCK_SIZE};
use crate::index;

pub struct Writer<W: Write + Seek> {
    sink: W,
    codec: Box<dyn Codec>,
    block_size: u64,
    /// Bytes accumulated by `write` not yet flushed into a block.
    pending: Vec<u8>,
    /// Compressed-region-relative start offset of each block. Always begins
    /// with `0` (block 0's start). The last block's own end (== cdata_length)
    /// is never stored here — it is a header field, not an index entry.
    entries: Vec<u64>,
    /// Bytes of compressed data written to the sink so far, relative to the
    /// start of the compressed region (i.e. excluding the header).
    current_offset: u64,
}

impl<W: Write + Seek> Writer<W> {
    /// Create a new Writer bound to `sink` and `codec`.
    ///
    /// `block_size` defaults to [`DEFAULT_BLOCK_SIZE`] (20 MiB) when `None`;
    /// it must be `> 0` or this fails with `InvalidArgument`.
    pub fn create(sink: W, codec: Box<dyn Codec>, block_size: Option<u64>) -> Result<Self> {
        let block_size = block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        if block_size == 0 {
            return Err(ZeexError::InvalidArgument("block_size must be > 0".into()));
        }

        let mut sink = sink;
        let placeholder = Header::placeholder(block_size);
        sink.write_all(&placeholder.to_bytes(false))?;

        Ok(Writer {
            sink,
            codec,
            block_size,
            pending: Vec::with_capacity(block_size as usize),
            entries: vec![0],
            current_offset: 0,
        })
    }

    /// Buffer `data` and flush any blocks that are now complete.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.pending.extend_from_slice(data);
        while self.pending.len() as u64 >= self.block_size {
            let raw: Vec<u8> = self.pending.drain(..self.block_size as usize).collect();
            self.flush_full_block(&raw)?;
        }
        Ok(())
    }

    /// Compress and write one full block, then record the new running
    /// compressed offset as the next block's start in the index.
    fn flush_full_block(&mut self, raw: &[u8]) -> Result<()> {
        let compressed = self.codec.compress(raw)?;
        self.sink.write_all(&compressed)?;
        self.current_offset += compressed.len() as u64;
        self.entries.push(self.current_offset);
        Ok(())
    }

    /// Flush the residual tail block (possibly empty — a compressed frame is
    /// still emitted, per spec §4.3), write the index, and rewrite the
    /// header with its final `ZEEX` magic and sizes.
    ///
    /// Returns the total number of blocks written (`N`).
    pub fn finish(mut self) -> Result<u64> {
        let tail = std::mem::take(&mut self.pending);
        let compressed = self.codec.compress(&tail)?;
        self.sink.write_all(&compressed)?;
        self.current_offset += compressed.len() as u64;

        let cdata_length = self.current_offset;
        let index_bytes = index::encode(&self.entries);
        self.sink.write_all(&index_bytes)?;

        let block_count = self.entries.len() as u64;
        let data_length = (block_count - 1) * self.block_size + tail.len() as u64;

        let header = Header {
            version: crate::format::CURRENT_VERSION,
            block_size: self.block_size,
            data_length,
            cdata_length,
        };
        self.sink.seek(SeekFrom::Start(0))?;
        self.sink.write_all(&header.to_bytes(true))?;
        self.sink.flush()?;

        Ok(block_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index as index_mod;
    use std::io::Cursor;

    /// A codec that stores bytes verbatim, for writer-only unit tests that
    /// don't need to exercise real compression.
    struct IdentityCodec;
    impl Codec for IdentityCodec {
        fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
            Ok(raw.to_vec())
        }
        fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>> {
            Ok(compressed.to_vec())
        }
    }

    #[test]
    fn rejects_zero_block_size() {
        let sink = Cursor::new(Vec::new());
        let err = Writer::create(sink, Box::new(IdentityCodec), Some(0)).unwrap_err();
        assert!(matches!(err, ZeexError::InvalidArgument(_)));
    }

    #[test]
    fn empty_input_still_emits_one_block() {
        let sink = Cursor::new(Vec::new());
        let w = Writer::create(sink, Box::new(IdentityCodec), Some(16)).unwrap();
        let n = w.finish().unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn header_is_rewritten_finalized_after_finish() {
        let mut buf = Vec::new();
        {
            let sink = Cursor::new(&mut buf);
            let mut w = Writer::create(sink, Box::new(IdentityCodec), Some(8)).unwrap();
            w.write(b"abcdefgh12").unwrap();
            w.finish().unwrap();
        }
        assert_eq!(&buf[0..4], crate::format::MAGIC_FINALIZED);
    }

    #[test]
    fn index_entries_match_expected_layout() {
        // 2 full 4-byte blocks + a 3-byte tail, identity codec (compressed == raw).
        let mut buf = Vec::new();
        {
            let sink = Cursor::new(&mut buf);
            let mut w = Writer::create(sink, Box::new(IdentityCodec), Some(4)).unwrap();
            w.write(b"abcdefgh123").unwrap(); // 11 bytes: 2 full blocks + 3-byte tail
            let n = w.finish().unwrap();
            assert_eq!(n, 3);
        }

        let header_bytes: [u8; crate::format::HEADER_SIZE] =
            buf[0..crate::format::HEADER_SIZE].try_into().unwrap();
        let header = crate::format::Header::from_bytes(&header_bytes, Some(buf.len() as u64)).unwrap();
        assert_eq!(header.data_length, 11);
        assert_eq!(header.cdata_length, 11); // identity codec: compressed len == raw len

        let index_offset = crate::format::HEADER_SIZE + header.cdata_length as usize;
        let index_size = u32::from_le_bytes(buf[index_offset..index_offset + 4].try_into().unwrap());
        assert_eq!(index_size, 3);
        let entries = index_mod::decode_entries(&buf[index_offset + 4..], index_size);
        assert_eq!(entries, vec![0, 4, 8]);
    }
}
