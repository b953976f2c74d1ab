//! Fixed-capacity wrapping arena.
//!
//! [`FixedArena`] bump-allocates from a single buffer whose size is
//! decided at construction. It never grows: the capacity is a budget,
//! and exceeding it is a sizing bug, reported by a panic with a
//! capacity diagnostic rather than a recoverable error.

use bytemuck::Pod;
use loam_core::align_forward;

use crate::handle::{AllocHandle, ArrayHandle, ItemHandle};
use crate::poison;

/// Word type of the backing storage. Using `u64` guarantees the buffer
/// base is 8-aligned, which makes padding deterministic for the common
/// alignments (1..=8) regardless of where the allocator places us.
type Word = u64;

const WORD_BYTES: usize = std::mem::size_of::<Word>();

/// A cursor position that can be rewound to.
///
/// Checkpoints mark a cursor position, not an allocation: rewinding to
/// one reclaims everything pushed after [`FixedArena::mark`] was called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Checkpoint {
    pub(crate) offset: usize,
}

/// Bump arena over a fixed-size buffer.
///
/// # Fatal exhaustion
///
/// `push` on a full arena panics. There is deliberately no recoverable
/// out-of-memory path: arena sizes are chosen upfront as a capacity
/// budget, and exhausting one mid-frame has no sane recovery.
///
/// # Rewinding
///
/// [`FixedArena::rewind`] resets the cursor to zero and bumps the arena
/// generation, so resolving any previously issued handle panics.
/// [`FixedArena::rewind_to`] reclaims back to a [`Checkpoint`] without
/// bumping the generation; handles above the checkpoint stay resolvable
/// but their contents are poisoned in debug builds — not retaining them
/// is the caller's contract, exactly as with a scoped stack frame.
pub struct FixedArena {
    words: Vec<Word>,
    /// Capacity budget in bytes. May be less than `words.len() * 8`
    /// when the requested capacity is not a multiple of the word size.
    capacity: usize,
    /// Bump cursor in bytes.
    cursor: usize,
    generation: u32,
}

impl FixedArena {
    /// Create an arena with a `capacity`-byte budget, zero-initialised.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "fixed arena capacity must be non-zero");
        Self {
            words: vec![0; capacity.div_ceil(WORD_BYTES)],
            capacity,
            cursor: 0,
            generation: 0,
        }
    }

    /// Allocate `size` zero-filled bytes aligned to `align`.
    ///
    /// A zero-length push is valid and returns an empty handle.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two, or — fatally — if the
    /// request does not fit in the remaining budget.
    pub fn push(&mut self, size: usize, align: usize) -> AllocHandle {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        if size == 0 {
            return AllocHandle::new(self.generation, 0, 0, 0);
        }

        let base = self.words.as_ptr() as usize;
        let offset = align_forward(base + self.cursor, align) - base;
        let end = offset
            .checked_add(size)
            .unwrap_or_else(|| self.exhausted(size, align));
        if end > self.capacity {
            self.exhausted(size, align);
        }

        self.cursor = end;
        let bytes = &mut bytemuck::cast_slice_mut::<Word, u8>(&mut self.words)[offset..end];
        bytes.fill(0);
        AllocHandle::new(self.generation, 0, offset as u32, size as u32)
    }

    /// Allocate a single zeroed `T`.
    pub fn push_item<T: Pod>(&mut self) -> ItemHandle<T> {
        let size = std::mem::size_of::<T>();
        assert!(size > 0, "zero-sized element types are not supported");
        ItemHandle::new(self.push(size, std::mem::align_of::<T>()))
    }

    /// Allocate a zeroed `[T]` of `len` elements.
    pub fn push_array<T: Pod>(&mut self, len: usize) -> ArrayHandle<T> {
        let elem = std::mem::size_of::<T>();
        assert!(elem > 0, "zero-sized element types are not supported");
        let raw = self.push(elem * len, std::mem::align_of::<T>());
        ArrayHandle::new(raw, len as u32)
    }

    /// Allocate an array holding a copy of `src`.
    pub fn push_array_clone<T: Pod>(&mut self, src: &[T]) -> ArrayHandle<T> {
        let h = self.push_array(src.len());
        self.array_mut(h).copy_from_slice(src);
        h
    }

    /// Resolve a handle to its bytes.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale (issued before the last rewind).
    pub fn bytes(&self, h: AllocHandle) -> &[u8] {
        self.check(h);
        let start = h.offset as usize;
        &bytemuck::cast_slice::<Word, u8>(&self.words)[start..start + h.len as usize]
    }

    /// Resolve a handle to its bytes, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn bytes_mut(&mut self, h: AllocHandle) -> &mut [u8] {
        self.check(h);
        let start = h.offset as usize;
        &mut bytemuck::cast_slice_mut::<Word, u8>(&mut self.words)[start..start + h.len as usize]
    }

    /// Resolve a typed item handle.
    pub fn item<T: Pod>(&self, h: ItemHandle<T>) -> &T {
        bytemuck::from_bytes(self.bytes(h.raw))
    }

    /// Resolve a typed item handle, mutably.
    pub fn item_mut<T: Pod>(&mut self, h: ItemHandle<T>) -> &mut T {
        bytemuck::from_bytes_mut(self.bytes_mut(h.raw))
    }

    /// Resolve a typed array handle.
    pub fn array<T: Pod>(&self, h: ArrayHandle<T>) -> &[T] {
        bytemuck::cast_slice(self.bytes(h.raw))
    }

    /// Resolve a typed array handle, mutably.
    pub fn array_mut<T: Pod>(&mut self, h: ArrayHandle<T>) -> &mut [T] {
        bytemuck::cast_slice_mut(self.bytes_mut(h.raw))
    }

    /// Record the current cursor position for a later [`FixedArena::rewind_to`].
    pub fn mark(&self) -> Checkpoint {
        Checkpoint {
            offset: self.cursor,
        }
    }

    /// Reclaim everything pushed since `checkpoint`.
    ///
    /// Idempotent: rewinding to the same checkpoint twice is a no-op
    /// the second time. Reclaimed bytes are poisoned in debug builds.
    ///
    /// # Panics
    ///
    /// Panics if the checkpoint lies above the current cursor (it was
    /// taken inside a region that has already been reclaimed).
    pub fn rewind_to(&mut self, checkpoint: Checkpoint) {
        assert!(
            checkpoint.offset <= self.cursor,
            "checkpoint at {} is above the cursor at {}",
            checkpoint.offset,
            self.cursor
        );
        let bytes = bytemuck::cast_slice_mut::<Word, u8>(&mut self.words);
        poison(&mut bytes[checkpoint.offset..self.cursor]);
        self.cursor = checkpoint.offset;
    }

    /// Reclaim the entire arena and invalidate all outstanding handles.
    ///
    /// Bumps the generation (when anything was allocated), so resolving
    /// a handle issued before the rewind panics. Idempotent.
    pub fn rewind(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.rewind_to(Checkpoint { offset: 0 });
        self.generation += 1;
    }

    /// Bytes currently allocated.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// The capacity budget in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes remaining before the next non-padded push would be fatal.
    pub fn remaining(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Current arena generation (bumped by full rewinds).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn check(&self, h: AllocHandle) {
        assert_eq!(
            h.generation, self.generation,
            "stale handle: {h} resolved against generation {}",
            self.generation
        );
    }

    fn exhausted(&self, size: usize, align: usize) -> ! {
        panic!(
            "fixed arena exhausted: requested {size} bytes (align {align}), \
             {} of {} bytes remain",
            self.remaining(),
            self.capacity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_returns_zeroed_bytes() {
        let mut arena = FixedArena::new(256);
        let h = arena.push(32, 8);
        assert!(arena.bytes(h).iter().all(|&b| b == 0));
    }

    #[test]
    fn reused_memory_is_zeroed_again() {
        let mut arena = FixedArena::new(64);
        let h = arena.push(16, 1);
        arena.bytes_mut(h).fill(0xFF);
        arena.rewind();
        let h2 = arena.push(16, 1);
        assert!(arena.bytes(h2).iter().all(|&b| b == 0));
    }

    #[test]
    fn sequential_pushes_never_overlap() {
        let mut arena = FixedArena::new(1024);
        let a = arena.push(10, 1);
        let b = arena.push(20, 1);
        arena.bytes_mut(a).fill(1);
        arena.bytes_mut(b).fill(2);
        assert!(arena.bytes(a).iter().all(|&v| v == 1));
        assert!(arena.bytes(b).iter().all(|&v| v == 2));
    }

    #[test]
    fn exact_fill_succeeds() {
        // 40 + 24 = 64 with no padding (cursor stays 8-aligned).
        let mut arena = FixedArena::new(64);
        let _ = arena.push(40, 8);
        let _ = arena.push(24, 8);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "fixed arena exhausted")]
    fn one_byte_past_capacity_is_fatal() {
        let mut arena = FixedArena::new(64);
        let _ = arena.push(40, 8);
        let _ = arena.push(24, 8);
        let _ = arena.push(1, 1);
    }

    #[test]
    fn zero_length_push_is_valid() {
        let mut arena = FixedArena::new(16);
        let h = arena.push(0, 1);
        assert!(h.is_empty());
        assert!(arena.bytes(h).is_empty());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn rewind_to_checkpoint_reclaims_scope() {
        let mut arena = FixedArena::new(128);
        let _ = arena.push(16, 1);
        let cp = arena.mark();
        let _ = arena.push(32, 1);
        assert_eq!(arena.used(), 48);
        arena.rewind_to(cp);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn rewind_to_is_idempotent() {
        let mut arena = FixedArena::new(128);
        let _ = arena.push(16, 1);
        let cp = arena.mark();
        let _ = arena.push(32, 1);
        arena.rewind_to(cp);
        let used = arena.used();
        arena.rewind_to(cp);
        assert_eq!(arena.used(), used);
    }

    #[test]
    fn handles_below_checkpoint_survive_partial_rewind() {
        let mut arena = FixedArena::new(128);
        let keep = arena.push(8, 1);
        arena.bytes_mut(keep).fill(7);
        let cp = arena.mark();
        let _ = arena.push(64, 1);
        arena.rewind_to(cp);
        assert!(arena.bytes(keep).iter().all(|&v| v == 7));
    }

    #[test]
    #[should_panic(expected = "stale handle")]
    fn full_rewind_invalidates_handles() {
        let mut arena = FixedArena::new(64);
        let h = arena.push(8, 1);
        arena.rewind();
        let _ = arena.bytes(h);
    }

    #[test]
    fn rewind_of_empty_arena_keeps_generation() {
        let mut arena = FixedArena::new(64);
        let h = arena.push(0, 1);
        arena.rewind();
        arena.rewind();
        // Nothing was allocated, so the empty handle stays resolvable.
        assert!(arena.bytes(h).is_empty());
        assert_eq!(arena.generation(), 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn reclaimed_bytes_are_poisoned_in_debug() {
        let mut arena = FixedArena::new(64);
        let cp = arena.mark();
        let h = arena.push(8, 1);
        arena.bytes_mut(h).fill(1);
        arena.rewind_to(cp);
        // The handle is still resolvable after a partial rewind; its
        // contents must now read as poison, not stale data.
        assert!(arena.bytes(h).iter().all(|&v| v == crate::POISON_BYTE));
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn non_power_of_two_alignment_rejected() {
        let _ = FixedArena::new(64).push(8, 3);
    }

    #[test]
    fn typed_array_round_trip() {
        let mut arena = FixedArena::new(256);
        let h = arena.push_array::<f32>(8);
        arena.array_mut(h)[3] = 2.5;
        assert_eq!(arena.array(h)[3], 2.5);
        assert_eq!(arena.array(h).len(), 8);
    }

    #[test]
    fn typed_item_round_trip() {
        let mut arena = FixedArena::new(64);
        let h = arena.push_item::<u64>();
        *arena.item_mut(h) = 0xDEAD_BEEF;
        assert_eq!(*arena.item(h), 0xDEAD_BEEF);
    }

    #[test]
    fn array_clone_copies_source() {
        let mut arena = FixedArena::new(256);
        let h = arena.push_array_clone(&[1i32, 2, 3, 4]);
        assert_eq!(arena.array(h), &[1, 2, 3, 4]);
    }

    proptest! {
        #[test]
        fn every_push_is_aligned(sizes in prop::collection::vec((1usize..64, 0u32..5), 1..16)) {
            let mut arena = FixedArena::new(1 << 16);
            for (size, shift) in sizes {
                let align = 1usize << shift;
                let h = arena.push(size, align);
                let addr = arena.bytes(h).as_ptr() as usize;
                prop_assert_eq!(addr % align, 0);
            }
        }

        #[test]
        fn pushes_are_disjoint_and_in_order(sizes in prop::collection::vec(1usize..64, 1..16)) {
            let mut arena = FixedArena::new(1 << 16);
            let mut prev_end = 0usize;
            for size in sizes {
                let h = arena.push(size, 8);
                let start = h.offset as usize;
                prop_assert!(start >= prev_end);
                prev_end = start + size;
            }
        }
    }
}
