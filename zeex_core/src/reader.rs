//! Random-access Reader (C6), backed by the Section Planner (C4) and the
//! Block Fetcher + Cache (C5).
//!
//! # Open sequence
//! 1. Read the 30-byte header; validate magic/version against the observed
//!    file length.
//! 2. Seek to `HEADER_SIZE + cdata_length`, read `index_size` then exactly
//!    `index_size` entries, and validate the index invariants.
//!
//! The index is loaded eagerly so random access never pays index I/O.

use std::io::{Read, Seek, SeekFrom};

use crate::cache::BlockCache;
use crate::codec::Codec;
use crate::error::{Result, ZeexError};
use crate::format::{Header, HEADER_SIZE};
use crate::index;
use crate::planner;

/// Default bound on the number of decompressed blocks memoized at once.
pub const DEFAULT_CACHE_CAPACITY: usize = 5;

pub struct Reader<R: Read + Seek> {
    source: R,
    header: Header,
    /// Compressed-region-relative start offset of each block.
    entries: Vec<u64>,
    codec: Box<dyn Codec>,
    pos: u64,
    cache: BlockCache,
}

impl<R: Read + Seek> Reader<R> {
    /// Open a ZEEX file from `source`, validating the header and eagerly
    /// loading the block index.
    pub fn open(mut source: R, codec: Box<dyn Codec>) -> Result<Self> {
        let current = source.stream_position()?;
        let file_len = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(current))?;

        source.seek(SeekFrom::Start(0))?;
        let mut header_buf = [0u8; HEADER_SIZE];
        source.read_exact(&mut header_buf)?;
        let header = Header::from_bytes(&header_buf, Some(file_len))?;

        source.seek(SeekFrom::Start(HEADER_SIZE as u64 + header.cdata_length))?;
        let mut size_buf = [0u8; 4];
        source.read_exact(&mut size_buf)?;
        let index_size = u32::from_le_bytes(size_buf);

        let mut entries_buf = vec![0u8; index_size as usize * 8];
        source.read_exact(&mut entries_buf)?;
        let entries = index::decode_entries(&entries_buf, index_size);
        index::validate(&entries, header.cdata_length)?;

        Ok(Reader {
            source,
            header,
            entries,
            codec,
            pos: 0,
            cache: BlockCache::new(DEFAULT_CACHE_CAPACITY),
        })
    }

    pub fn block_count(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn block_size(&self) -> u64 {
        self.header.block_size
    }

    pub fn data_length(&self) -> u64 {
        self.header.data_length
    }

    pub fn cdata_length(&self) -> u64 {
        self.header.cdata_length
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    /// Compressed-region-relative `[start, end)` span for `block`.
    fn block_span(&self, block: u64) -> Result<(u64, u64)> {
        let n = self.entries.len() as u64;
        if block >= n {
            return Err(ZeexError::OutOfBoundsBlock {
                block,
                block_count: n,
            });
        }
        let start = self.entries[block as usize];
        let end = if block + 1 < n {
            self.entries[(block + 1) as usize]
        } else {
            self.header.cdata_length
        };
        Ok((start, end))
    }

    /// Decompress and return block `block`'s raw bytes (C5), satisfying
    /// cache hits without touching the source.
    fn fetch_block(&mut self, block: u64) -> Result<Vec<u8>> {
        if let Some(data) = self.cache.get(block) {
            return Ok(data.clone());
        }

        let (start, end) = self.block_span(block)?;
        let len = end - start;

        self.source.seek(SeekFrom::Start(HEADER_SIZE as u64 + start))?;
        let mut compressed = vec![0u8; len as usize];
        self.source.read_exact(&mut compressed)?;
        let raw = self.codec.decompress(&compressed)?;

        self.cache.insert(block, raw.clone());
        Ok(raw)
    }

    /// Read exactly `len` bytes starting at the current cursor position.
    ///
    /// `len` is mandatory: there is no "read the rest of the file"
    /// shortcut, since this format targets files where that default is
    /// almost always a bug (spec §4.6).
    pub fn read(&mut self, len: u64) -> Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let sections = planner::plan(self.pos, len, self.header.block_size);
        let mut out = Vec::with_capacity(len as usize);

        for sec in &sections {
            let block_data = match self.fetch_block(sec.block_index) {
                Ok(d) => d,
                Err(ZeexError::OutOfBoundsBlock { .. }) => {
                    return Err(ZeexError::OutOfBounds {
                        offset: sec.block_index * self.header.block_size + sec.in_block_offset,
                        len: sec.length,
                    })
                }
                Err(e) => return Err(e),
            };

            let start = sec.in_block_offset as usize;
            let end = start + sec.length as usize;
            if end > block_data.len() {
                return Err(ZeexError::OutOfBounds {
                    offset: sec.block_index * self.header.block_size + sec.in_block_offset,
                    len: sec.length,
                });
            }
            out.extend_from_slice(&block_data[start..end]);
        }

        if out.len() as u64 != len {
            return Err(ZeexError::OutOfBounds {
                offset: self.pos,
                len,
            });
        }

        self.pos += len;
        Ok(out)
    }

    /// Move the cursor to `pos`. `pos == data_length` is not seekable —
    /// callers detect end-of-file by comparing against `data_length`.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        if pos >= self.header.data_length {
            return Err(ZeexError::IllegalSeek {
                pos,
                data_length: self.header.data_length,
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Release the source. Consumes `self`.
    pub fn close(self) {}
}
