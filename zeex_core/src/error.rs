use thiserror::Error;

/// The full error taxonomy surfaced by `zeex_core`.
///
/// Every public operation returns one of these kinds rather than panicking
/// or collapsing distinct failures into a single catch-all — callers (and
/// tests) can match on the specific kind the spec calls for.
#[derive(Error, Debug)]
pub enum ZeexError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown file format: magic bytes are neither ZEEX nor ZZXX")]
    UnknownFormat,

    #[error("file is unfinished: writer never completed close()")]
    Unfinished,

    #[error("incompatible version: file is version {found}, this codec supports up to {max}")]
    IncompatibleVersion { found: u16, max: u16 },

    #[error("malformed index: {0}")]
    MalformedIndex(String),

    #[error("block index {block} out of range (file has {block_count} blocks)")]
    OutOfBoundsBlock { block: u64, block_count: u64 },

    #[error("read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: u64, len: u64 },

    #[error("illegal seek to {pos}: data_length is {data_length}")]
    IllegalSeek { pos: u64, data_length: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(String),
}

pub type Result<T> = std::result::Result<T, ZeexError>;
