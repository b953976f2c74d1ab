//! Activity-tracked slot pool.
//!
//! A [`SlotPool`] hands out slot indices from a fixed range using a
//! first-unset-bit scan over an activity [`BitSet`]. It is the
//! bookkeeping half of every fixed-capacity resource pool in the
//! framework (texture slots, sound instances); the payload itself
//! lives in a parallel arena-allocated array indexed by the slot.

use crate::bitset::BitSet;

/// Fixed-capacity slot allocator backed by an activity bitset.
pub struct SlotPool {
    active: BitSet,
}

impl SlotPool {
    /// Create a pool of `capacity` inactive slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            active: BitSet::new(capacity),
        }
    }

    /// Claim the lowest inactive slot, or `None` if the pool is full.
    pub fn acquire(&mut self) -> Option<usize> {
        let slot = self.active.first_unset(0)?;
        self.active.set(slot);
        Some(slot)
    }

    /// Release an active slot back to the pool.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range or not currently active
    /// (double release).
    pub fn release(&mut self, slot: usize) {
        assert!(
            self.active.is_set(slot),
            "slot {slot} released while inactive"
        );
        self.active.unset(slot);
    }

    /// Whether `slot` is currently claimed.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn is_active(&self, slot: usize) -> bool {
        self.active.is_set(slot)
    }

    /// Number of claimed slots.
    pub fn active_count(&self) -> usize {
        self.active.count_set()
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.active.bit_cnt()
    }

    /// Whether every slot is claimed.
    pub fn is_full(&self) -> bool {
        self.active.all_set()
    }

    /// Release every slot.
    pub fn clear(&mut self) {
        self.active.clear_all();
    }

    /// The underlying activity bitset.
    pub fn activity(&self) -> &BitSet {
        &self.active
    }
}
