//! Bump-allocated arenas for the Loam memory core.
//!
//! Two arena variants share one allocation model (aligned bump cursor,
//! zero-filled allocations, bulk reclamation by rewind, no per-object
//! free):
//!
//! - [`FixedArena`] — a fixed capacity budget decided at construction.
//!   Exhausting it is a fatal error, not a runtime condition.
//! - [`BlockArena`] — grows by appending blocks from the system
//!   allocator. Growth never moves existing allocations.
//!
//! # Handles
//!
//! `push` returns an [`AllocHandle`] rather than a reference; bytes are
//! resolved on demand through the arena. A handle captures the arena
//! generation at allocation time, and resolving it after a full rewind
//! panics — use-after-rewind is a checked precondition violation, not
//! silent reuse of recycled memory.
//!
//! # Temporary arenas
//!
//! The intended pattern is one long-lived arena for permanent data and
//! one per-frame arena that the owning loop rewinds at a well-defined
//! point each frame. Rewinding is the only deallocation mechanism.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod fixed;
pub mod handle;

pub use block::BlockArena;
pub use fixed::{Checkpoint, FixedArena};
pub use handle::{AllocHandle, ArrayHandle, ItemHandle};

/// Fill pattern written over reclaimed memory in debug builds.
///
/// Reading poisoned bytes through a stale (but unchecked) access shows
/// up as an obviously wrong value instead of plausible stale data.
pub const POISON_BYTE: u8 = 0xDD;

/// Poison a reclaimed byte range in debug builds; no-op in release.
pub(crate) fn poison(bytes: &mut [u8]) {
    if cfg!(debug_assertions) {
        bytes.fill(POISON_BYTE);
    }
}
