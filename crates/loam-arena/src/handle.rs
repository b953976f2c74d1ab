//! Allocation handles.
//!
//! An [`AllocHandle`] encodes the physical location of an allocation
//! within an arena: generation, block index, byte offset, and length.
//! It is `Copy`, carries no lifetime, and resolves to a slice in O(1)
//! through the owning arena. [`ItemHandle`] and [`ArrayHandle`] are
//! typed wrappers produced by the typed push helpers.

use std::fmt;
use std::marker::PhantomData;

/// Physical location of a raw byte allocation within an arena.
///
/// A handle is only meaningful to the arena that issued it. The
/// captured `generation` lets the arena reject handles that survived a
/// full rewind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct AllocHandle {
    /// Arena generation when this allocation was made.
    pub(crate) generation: u32,
    /// Which block this allocation lives in (always 0 for fixed arenas).
    pub(crate) block: u16,
    /// Byte offset within the block.
    pub(crate) offset: u32,
    /// Length in bytes.
    pub(crate) len: u32,
}

impl AllocHandle {
    pub(crate) fn new(generation: u32, block: u16, offset: u32, len: u32) -> Self {
        Self {
            generation,
            block,
            offset,
            len,
        }
    }

    /// The arena generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Length of the allocation in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for AllocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AllocHandle(gen={}, block={}, off={}, len={})",
            self.generation, self.block, self.offset, self.len
        )
    }
}

/// Typed handle to a single `T` allocated in an arena.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct ItemHandle<T> {
    pub(crate) raw: AllocHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ItemHandle<T> {
    pub(crate) fn new(raw: AllocHandle) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// The underlying byte handle.
    pub fn raw(&self) -> AllocHandle {
        self.raw
    }
}

impl<T> Clone for ItemHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemHandle<T> {}

/// Typed handle to a `[T]` allocated in an arena.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct ArrayHandle<T> {
    pub(crate) raw: AllocHandle,
    pub(crate) len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArrayHandle<T> {
    pub(crate) fn new(raw: AllocHandle, len: u32) -> Self {
        Self {
            raw,
            len,
            _marker: PhantomData,
        }
    }

    /// The underlying byte handle.
    pub fn raw(&self) -> AllocHandle {
        self.raw
    }

    /// Number of `T` elements.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the array has zero elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Clone for ArrayHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayHandle<T> {}
