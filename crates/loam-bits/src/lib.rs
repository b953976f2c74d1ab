//! Packed bitset and slot-activity tracking.
//!
//! [`BitSet`] is a packed bit array with a logical bit count that need
//! not be a multiple of eight — every whole-set query masks the unused
//! bits of the partial final byte. [`SlotPool`] layers first-free-slot
//! allocation on top, the structure used for resource-slot and
//! sound-instance activity tracking throughout the framework.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bitset;
pub mod pool;

pub use bitset::{BitSet, MaskOp};
pub use pool::SlotPool;
