//! Byte-stream serialization for the Loam containers.
//!
//! Length prefixes and counts are little-endian `i32`; element payloads
//! are the packed in-memory representation of their `Pod` type, exactly
//! as the asset packer lays them out. The format is intentionally
//! simple: no compression, no alignment padding, no self-describing
//! schema.
//!
//! All failures here are recoverable [`CodecError`] results: a missing
//! or truncated asset file is an application-level concern, unlike the
//! fatal allocation errors of the arena layer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod pack;

pub use codec::{
    read_array, read_bitset, read_chain_map, read_i32_le, read_u8, write_array, write_bitset,
    write_chain_map, write_i32_le, write_u8,
};
pub use error::CodecError;
pub use pack::{PackReader, PackWriter};

/// Magic bytes at the start of a pack file.
pub const MAGIC: [u8; 4] = *b"LOAM";

/// Current pack format version.
pub const FORMAT_VERSION: u8 = 1;
