pub mod cache;
pub mod codec;
pub mod error;
pub mod format;
pub mod index;
pub mod planner;
pub mod reader;
pub mod writer;

pub use codec::Codec;
pub use error::{Result, ZeexError};
pub use format::{Header, CURRENT_VERSION, DEFAULT_BLOCK_SIZE, HEADER_SIZE};
pub use reader::Reader;
pub use writer::Writer;
