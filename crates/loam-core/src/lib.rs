//! Foundation types for the Loam memory core.
//!
//! This is the leaf crate with zero dependencies. It provides the
//! alignment arithmetic used by the arena allocators, a fixed-capacity
//! inline vector for hot-path collections that must never touch the
//! heap, and an explicit-state deterministic random number generator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod align;
pub mod fixed_vec;
pub mod rng;

pub use align::{align_forward, is_aligned};
pub use fixed_vec::FixedVec;
pub use rng::Pcg32;
