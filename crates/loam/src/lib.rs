//! Loam: the arena memory core of a small game framework.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Loam sub-crates. For most users, adding `loam` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//!
//! // One long-lived arena for level data, rewound between levels.
//! let mut arena = FixedArena::new(4096);
//! let metrics = arena.push_array_clone(&[12.0f32, 9.5, 14.0]);
//! assert_eq!(arena.array(metrics), [12.0, 9.5, 14.0]);
//!
//! // Track which entity slots are live.
//! let mut pool = SlotPool::new(64);
//! let hero = pool.acquire().unwrap();
//! assert!(pool.is_active(hero));
//!
//! // Hash map with caller-chosen bucket and block sizing.
//! let mut names: ChainMap<u32, u64> = ChainMap::new(32, 16, loam::kv::hash_u32);
//! let _ = names.put(7, 0xCAFE);
//! assert_eq!(names.get(&7), Some(&0xCAFE));
//!
//! // Serialize the map and read it back.
//! let mut buf = Vec::new();
//! let mut writer = PackWriter::new(&mut buf).unwrap();
//! writer.write_chain_map(&names).unwrap();
//! drop(writer);
//! let mut reader = PackReader::open(buf.as_slice()).unwrap();
//! let restored: ChainMap<u32, u64> = reader.read_chain_map(loam::kv::hash_u32, 16).unwrap();
//! assert_eq!(restored.get(&7), Some(&0xCAFE));
//!
//! // Done with the level: reclaim everything at once.
//! arena.rewind();
//! assert_eq!(arena.used(), 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `loam-arena` | Fixed and block-growing bump arenas, typed handles |
//! | [`bits`] | `loam-bits` | Packed bitsets, mask combinators, slot pools |
//! | [`kv`] | `loam-kv` | Chained hash map over flat blocks, FNV-1a hashing |
//! | [`codec`] | `loam-codec` | Byte-stream serialization and pack files |
//! | [`util`] | `loam-core` | Alignment math, inline vectors, the frame RNG |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Bump arenas and typed allocation handles (`loam-arena`).
///
/// [`arena::FixedArena`] for a hard capacity budget,
/// [`arena::BlockArena`] for growth by appended blocks. Both hand out
/// generation-checked handles instead of references.
pub use loam_arena as arena;

/// Packed bitsets and slot pools (`loam-bits`).
///
/// [`bits::BitSet`] stores bits LSB-first in packed bytes;
/// [`bits::SlotPool`] layers lowest-free-slot acquisition on top of it.
pub use loam_bits as bits;

/// Chained hash map and hashing helpers (`loam-kv`).
///
/// [`kv::ChainMap`] resolves collisions by chaining through flat
/// parallel-array blocks; [`kv::fnv1a_bytes`] and friends provide the
/// default hash functions.
pub use loam_kv as kv;

/// Byte-stream serialization (`loam-codec`).
///
/// Free functions in [`codec::codec`] encode individual containers;
/// [`codec::PackWriter`] and [`codec::PackReader`] wrap a whole
/// header-tagged pack stream.
pub use loam_codec as codec;

/// Alignment math, inline vectors, and the frame RNG (`loam-core`).
pub use loam_core as util;

/// Common imports for typical Loam usage.
///
/// ```rust
/// use loam::prelude::*;
/// ```
///
/// This imports the most frequently used types: both arena variants
/// and their handles, the bitset and slot pool, the chain map, and the
/// pack writer and reader.
pub mod prelude {
    // Arenas and handles
    pub use loam_arena::{
        AllocHandle, ArrayHandle, BlockArena, Checkpoint, FixedArena, ItemHandle,
    };

    // Bitsets
    pub use loam_bits::{BitSet, MaskOp, SlotPool};

    // Hash map
    pub use loam_kv::{ChainMap, PutOutcome};

    // Serialization
    pub use loam_codec::{CodecError, PackReader, PackWriter};

    // Utilities
    pub use loam_core::{FixedVec, Pcg32};
}
