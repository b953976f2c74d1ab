//! Fixed-capacity inline vector.
//!
//! [`FixedVec`] stores up to `N` elements directly in the struct with
//! no heap allocation and no spill. It is the static-array counterpart
//! to the arena-backed arrays: capacity is part of the type, exceeding
//! it is a precondition violation rather than a growth event.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// A vector with fixed inline capacity `N`.
///
/// Unlike a small-vector type this never spills to the heap — `push`
/// beyond `N` elements panics. Dereferences to `&[T]` / `&mut [T]`, so
/// everything that accepts a slice view accepts a `FixedVec`.
#[derive(Clone)]
pub struct FixedVec<T, const N: usize> {
    items: [T; N],
    len: usize,
}

impl<T: Copy + Default, const N: usize> FixedVec<T, N> {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self {
            items: [T::default(); N],
            len: 0,
        }
    }

    /// Create a vector holding a copy of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() > N`.
    pub fn from_slice(src: &[T]) -> Self {
        assert!(
            src.len() <= N,
            "FixedVec capacity {N} cannot hold {} elements",
            src.len()
        );
        let mut v = Self::new();
        v.items[..src.len()].copy_from_slice(src);
        v.len = src.len();
        v
    }

    /// Append an element.
    ///
    /// # Panics
    ///
    /// Panics if the vector is full.
    pub fn push(&mut self, item: T) {
        assert!(self.len < N, "FixedVec capacity {N} exceeded");
        self.items[self.len] = item;
        self.len += 1;
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.items[self.len])
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Maximum number of elements.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of free slots remaining.
    pub fn remaining(&self) -> usize {
        N - self.len
    }

    /// Whether the vector holds `N` elements.
    pub fn is_full(&self) -> bool {
        self.len == N
    }
}

impl<T: Copy + Default, const N: usize> Default for FixedVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for FixedVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items[..self.len]
    }
}

impl<T, const N: usize> DerefMut for FixedVec<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items[..self.len]
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const N: usize> PartialEq for FixedVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self[..] == other[..]
    }
}

impl<T: Eq, const N: usize> Eq for FixedVec<T, N> {}
