//! Chained hash map over block storage.
//!
//! [`ChainMap`] resolves collisions by chaining through index links
//! into fixed-capacity storage blocks, not heap-allocated nodes. The
//! bucket table is sized once at creation; the backing store grows by
//! appending blocks. Used for glyph and kerning lookup tables and
//! general key-value needs where entry storage should be dense and
//! allocation-free after warm-up.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod hash;
pub mod map;

pub use hash::{fnv1a_bytes, hash_u32, hash_u64};
pub use map::{ChainMap, PutOutcome};
