use crate::error::Result;

/// The core's sole external compression dependency.
///
/// `zeex_core` never inspects, configures, or depends on a specific
/// compression algorithm — it only ever calls these two pure byte-to-byte
/// functions, once per block. Implementations must be safe to share across
/// threads (`Send + Sync`) since a `Reader`/`Writer` may be moved across
/// thread boundaries by the caller, even though no operation here is itself
/// concurrent.
pub trait Codec: Send + Sync {
    /// Compress one independent block of raw bytes.
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;

    /// Decompress one independent compressed frame back to raw bytes.
    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>>;
}
