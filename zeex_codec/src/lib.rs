//! LZMA implementation of [`zeex_core::Codec`].
//!
//! Each block is compressed as an independent LZMA frame: no dictionary or
//! state carries over between blocks, which is exactly what makes random
//! access by block possible (spec §4, C2).

use std::io::Cursor;

use zeex_core::{Codec, Result, ZeexError};

/// LZMA-backed codec. Stateless and cheap to construct; a single instance
/// can be shared across a `Writer`/`Reader` pair via `Box<dyn Codec>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LzmaCodec;

impl LzmaCodec {
    pub fn new() -> Self {
        LzmaCodec
    }
}

impl Codec for LzmaCodec {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        lzma_rs::lzma_compress(&mut Cursor::new(raw), &mut out)
            .map_err(|e| ZeexError::Codec(e.to_string()))?;
        Ok(out)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        lzma_rs::lzma_decompress(&mut Cursor::new(compressed), &mut out)
            .map_err(|e| ZeexError::Codec(e.to_string()))?;
        Ok(out)
    }
}
