//! Block-growing arena.
//!
//! [`BlockArena`] starts empty and appends blocks from the system
//! allocator as pushes demand them. Growth only ever appends: a handle
//! issued before a growth keeps resolving to the same bytes afterwards.
//! Blocks are retained across rewinds and reused front-to-back, so a
//! steady-state frame allocates nothing from the system.

use bytemuck::Pod;
use loam_core::align_forward;
use smallvec::SmallVec;

use crate::handle::{AllocHandle, ArrayHandle, ItemHandle};
use crate::poison;

type Word = u64;

const WORD_BYTES: usize = std::mem::size_of::<Word>();

/// One contiguous block with its own bump cursor.
struct Block {
    words: Vec<Word>,
    capacity: usize,
    cursor: usize,
}

impl Block {
    fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BYTES)],
            capacity,
            cursor: 0,
        }
    }

    /// Bump-allocate within this block, or `None` if it does not fit.
    fn try_alloc(&mut self, size: usize, align: usize) -> Option<usize> {
        let base = self.words.as_ptr() as usize;
        let offset = align_forward(base + self.cursor, align) - base;
        let end = offset.checked_add(size)?;
        if end > self.capacity {
            return None;
        }
        self.cursor = end;
        self.bytes_mut(offset, size).fill(0);
        Some(offset)
    }

    fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &bytemuck::cast_slice::<Word, u8>(&self.words)[offset..offset + len]
    }

    fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<Word, u8>(&mut self.words)[offset..offset + len]
    }

    fn reset(&mut self) {
        let used = self.cursor;
        poison(self.bytes_mut(0, used));
        self.cursor = 0;
    }
}

/// Bump arena over a growable list of blocks.
///
/// Created empty; the first push allocates the first block. A request
/// that does not fit the current block advances to the next existing
/// block, or appends a fresh one of `max(min_block_size, size + align)`
/// bytes. System allocation failure aborts the process (the global
/// allocator's handler) — like [`crate::FixedArena`], there is no
/// recoverable out-of-memory path.
///
/// [`BlockArena::rewind`] always resets to the very first block and
/// bumps the arena generation; resolving a handle issued before the
/// rewind panics.
pub struct BlockArena {
    blocks: SmallVec<[Block; 4]>,
    min_block_size: usize,
    /// Index of the block currently being filled.
    current: usize,
    generation: u32,
}

impl BlockArena {
    /// Create an empty arena. Blocks of at least `min_block_size` bytes
    /// are allocated lazily on demand.
    ///
    /// # Panics
    ///
    /// Panics if `min_block_size` is zero.
    pub fn new(min_block_size: usize) -> Self {
        assert!(min_block_size > 0, "minimum block size must be non-zero");
        Self {
            blocks: SmallVec::new(),
            min_block_size,
            current: 0,
            generation: 0,
        }
    }

    /// Allocate `size` zero-filled bytes aligned to `align`.
    ///
    /// A zero-length push is valid and returns an empty handle.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    pub fn push(&mut self, size: usize, align: usize) -> AllocHandle {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        if size == 0 {
            return AllocHandle::new(self.generation, 0, 0, 0);
        }

        // Fill the current block, then advance through blocks retained
        // from before the last rewind, appending a new one only when
        // every existing block has been exhausted.
        while self.current < self.blocks.len() {
            if let Some(offset) = self.blocks[self.current].try_alloc(size, align) {
                return self.handle_at(self.current, offset, size);
            }
            self.current += 1;
        }

        let block_size = self.min_block_size.max(size + align);
        let mut block = Block::new(block_size);
        let offset = block
            .try_alloc(size, align)
            .expect("fresh block is sized to fit the request");
        self.blocks.push(block);
        assert!(
            self.blocks.len() <= u16::MAX as usize,
            "block count exceeds handle addressing"
        );
        self.current = self.blocks.len() - 1;
        self.handle_at(self.current, offset, size)
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
        if h.is_empty() {
            return &[];
        }
        self.blocks[h.block as usize].bytes(h.offset as usize, h.len as usize)
    }

    /// Resolve a handle to its bytes, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn bytes_mut(&mut self, h: AllocHandle) -> &mut [u8] {
        self.check(h);
        if h.is_empty() {
            return &mut [];
        }
        self.blocks[h.block as usize].bytes_mut(h.offset as usize, h.len as usize)
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

    /// Reclaim everything and invalidate all outstanding handles.
    ///
    /// Blocks are kept for reuse; allocation restarts from the first
    /// block. Reclaimed bytes are poisoned in debug builds. Idempotent.
    pub fn rewind(&mut self) {
        if self.used() == 0 {
            return;
        }
        for block in &mut self.blocks {
            block.reset();
        }
        self.current = 0;
        self.generation += 1;
    }

    /// Bytes currently allocated across all blocks.
    pub fn used(&self) -> usize {
        self.blocks.iter().map(|b| b.cursor).sum()
    }

    /// Number of blocks currently allocated.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total backing storage across all blocks, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.words.len() * WORD_BYTES).sum()
    }

    /// The configured minimum block size in bytes.
    pub fn min_block_size(&self) -> usize {
        self.min_block_size
    }

    /// Current arena generation (bumped by rewinds).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn handle_at(&self, block: usize, offset: usize, size: usize) -> AllocHandle {
        AllocHandle::new(self.generation, block as u16, offset as u32, size as u32)
    }

    fn check(&self, h: AllocHandle) {
        assert_eq!(
            h.generation, self.generation,
            "stale handle: {h} resolved against generation {}",
            self.generation
        );
    }
}
