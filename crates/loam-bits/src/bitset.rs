//! Packed bit array with a non-byte-aligned logical length.
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8` (LSB first). When
//! `bit_cnt` is not a multiple of eight, the high bits of the final
//! byte are undefined: every query masks them out, and the shift and
//! rotate operations canonicalize them to zero before moving bits
//! around so garbage never leaks into the defined range.
//!
//! Scans and popcounts are table-driven: a byte at a time through
//! 256-entry lookup tables instead of a branch per bit.

/// Index of the lowest set bit per byte value (8 for a zero byte).
const FIRST_SET: [u8; 256] = build_first_set();

/// Number of set bits per byte value.
const POPCOUNT: [u8; 256] = build_popcount();

const fn build_first_set() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).trailing_zeros() as u8;
        i += 1;
    }
    table
}

const fn build_popcount() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
}

/// Byte-wise combining operation for [`BitSet::apply_mask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskOp {
    /// Keep bits set in both.
    And,
    /// Keep bits set in either.
    Or,
    /// Keep bits set in exactly one.
    Xor,
    /// Keep bits set here but not in the mask.
    AndNot,
}

/// A packed bit array with a logical bit count.
#[derive(Clone, Debug)]
pub struct BitSet {
    bytes: Vec<u8>,
    bit_cnt: usize,
}

impl BitSet {
    /// Create an all-unset bitset of `bit_cnt` bits.
    pub fn new(bit_cnt: usize) -> Self {
        Self {
            bytes: vec![0; bit_cnt.div_ceil(8)],
            bit_cnt,
        }
    }

    /// Wrap existing packed bytes as a bitset of `bit_cnt` bits.
    ///
    /// Bits beyond `bit_cnt` in the final byte are treated as
    /// undefined, not cleared.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len() != bit_cnt.div_ceil(8)`.
    pub fn from_bytes(bytes: Vec<u8>, bit_cnt: usize) -> Self {
        assert_eq!(
            bytes.len(),
            bit_cnt.div_ceil(8),
            "byte length does not match bit count {bit_cnt}"
        );
        Self { bytes, bit_cnt }
    }

    /// Number of logical bits.
    pub fn bit_cnt(&self) -> usize {
        self.bit_cnt
    }

    /// The packed backing bytes (`ceil(bit_cnt / 8)` of them).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Set bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= bit_cnt`.
    pub fn set(&mut self, index: usize) {
        self.check(index);
        self.bytes[index / 8] |= 1 << (index % 8);
    }

    /// Clear bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= bit_cnt`.
    pub fn unset(&mut self, index: usize) {
        self.check(index);
        self.bytes[index / 8] &= !(1 << (index % 8));
    }

    /// Whether bit `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= bit_cnt`.
    pub fn is_set(&self, index: usize) -> bool {
        self.check(index);
        self.bytes[index / 8] & (1 << (index % 8)) != 0
    }

    /// Set every bit. Undefined trailing bits are cleared as a side
    /// effect (they are free to take any value).
    pub fn set_all(&mut self) {
        self.bytes.fill(0xFF);
        self.mask_tail();
    }

    /// Clear every bit, including the undefined trailing bits.
    pub fn clear_all(&mut self) {
        self.bytes.fill(0);
    }

    /// Index of the first set bit at or after `from`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `from > bit_cnt`.
    pub fn first_set(&self, from: usize) -> Option<usize> {
        self.scan(from, false)
    }

    /// Index of the first unset bit at or after `from`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `from > bit_cnt`.
    pub fn first_unset(&self, from: usize) -> Option<usize> {
        self.scan(from, true)
    }

    /// Number of set bits.
    pub fn count_set(&self) -> usize {
        let mut count = 0usize;
        for (i, &byte) in self.bytes.iter().enumerate() {
            let masked = if i + 1 == self.bytes.len() {
                byte & self.tail_mask()
            } else {
                byte
            };
            count += POPCOUNT[masked as usize] as usize;
        }
        count
    }

    /// Whether every defined bit is set. True for an empty bitset.
    pub fn all_set(&self) -> bool {
        self.count_set() == self.bit_cnt
    }

    /// Whether every defined bit is unset. True for an empty bitset.
    pub fn all_unset(&self) -> bool {
        self.count_set() == 0
    }

    /// Combine with `mask` byte-wise under `op`.
    ///
    /// # Panics
    ///
    /// Panics if the bit counts differ.
    pub fn apply_mask(&mut self, mask: &BitSet, op: MaskOp) {
        assert_eq!(
            self.bit_cnt, mask.bit_cnt,
            "mask bit count does not match"
        );
        for (dst, &src) in self.bytes.iter_mut().zip(&mask.bytes) {
            *dst = match op {
                MaskOp::And => *dst & src,
                MaskOp::Or => *dst | src,
                MaskOp::Xor => *dst ^ src,
                MaskOp::AndNot => *dst & !src,
            };
        }
    }

    /// Shift every bit toward higher indices by `amount`; bits shifted
    /// past the end are dropped, vacated low bits become zero.
    pub fn shift_left(&mut self, amount: usize) {
        if self.bit_cnt == 0 {
            return;
        }
        if amount >= self.bit_cnt {
            self.clear_all();
            return;
        }
        self.mask_tail();
        let byte_shift = amount / 8;
        let bit_shift = (amount % 8) as u32;
        // Walk from the carry-destination end so each source byte is
        // read before it is overwritten.
        for j in (0..self.bytes.len()).rev() {
            let mut v = 0u8;
            if j >= byte_shift {
                v = self.bytes[j - byte_shift] << bit_shift;
                if bit_shift > 0 && j > byte_shift {
                    v |= self.bytes[j - byte_shift - 1] >> (8 - bit_shift);
                }
            }
            self.bytes[j] = v;
        }
        self.mask_tail();
    }

    /// Shift every bit toward lower indices by `amount`; bits shifted
    /// past index 0 are dropped, vacated high bits become zero.
    pub fn shift_right(&mut self, amount: usize) {
        if self.bit_cnt == 0 {
            return;
        }
        if amount >= self.bit_cnt {
            self.clear_all();
            return;
        }
        self.mask_tail();
        let byte_shift = amount / 8;
        let bit_shift = (amount % 8) as u32;
        let n = self.bytes.len();
        for j in 0..n {
            let src = j + byte_shift;
            let mut v = 0u8;
            if src < n {
                v = self.bytes[src] >> bit_shift;
                if bit_shift > 0 && src + 1 < n {
                    v |= self.bytes[src + 1] << (8 - bit_shift);
                }
            }
            self.bytes[j] = v;
        }
    }

    /// Rotate every bit toward higher indices by `amount`, wrapping
    /// modulo the bit count.
    pub fn rotate_left(&mut self, amount: usize) {
        if self.bit_cnt == 0 {
            return;
        }
        let amount = amount % self.bit_cnt;
        if amount == 0 {
            return;
        }
        let mut wrapped = self.clone();
        wrapped.shift_right(self.bit_cnt - amount);
        self.shift_left(amount);
        self.apply_mask(&wrapped, MaskOp::Or);
    }

    /// Rotate every bit toward lower indices by `amount`, wrapping
    /// modulo the bit count.
    pub fn rotate_right(&mut self, amount: usize) {
        if self.bit_cnt == 0 {
            return;
        }
        let amount = amount % self.bit_cnt;
        if amount == 0 {
            return;
        }
        let mut wrapped = self.clone();
        wrapped.shift_left(self.bit_cnt - amount);
        self.shift_right(amount);
        self.apply_mask(&wrapped, MaskOp::Or);
    }

    /// Mask for the defined bits of the final byte.
    fn tail_mask(&self) -> u8 {
        match self.bit_cnt % 8 {
            0 => 0xFF,
            rem => (1u8 << rem) - 1,
        }
    }

    /// Clear the undefined trailing bits of the final byte.
    fn mask_tail(&mut self) {
        if let Some(last) = self.bytes.last_mut() {
            let mask = match self.bit_cnt % 8 {
                0 => 0xFF,
                rem => (1u8 << rem) - 1,
            };
            *last &= mask;
        }
    }

    /// Table-driven byte-at-a-time scan. `invert` scans for unset bits.
    fn scan(&self, from: usize, invert: bool) -> Option<usize> {
        assert!(from <= self.bit_cnt, "scan start {from} out of range");
        let start_byte = from / 8;
        for i in start_byte..self.bytes.len() {
            let mut byte = if invert { !self.bytes[i] } else { self.bytes[i] };
            if i == start_byte {
                // Drop bits before the scan start.
                byte &= !((1u8 << (from % 8) as u32).wrapping_sub(1));
            }
            if i + 1 == self.bytes.len() {
                byte &= self.tail_mask();
            }
            let first = FIRST_SET[byte as usize] as usize;
            if first < 8 {
                let index = i * 8 + first;
                if index < self.bit_cnt {
                    return Some(index);
                }
            }
        }
        None
    }

    fn check(&self, index: usize) {
        assert!(
            index < self.bit_cnt,
            "bit index {index} out of range for {} bits",
            self.bit_cnt
        );
    }
}

impl PartialEq for BitSet {
    /// Logical equality: compares defined bits only, ignoring the
    /// undefined trailing bits of the final byte.
    fn eq(&self, other: &Self) -> bool {
        if self.bit_cnt != other.bit_cnt {
            return false;
        }
        if self.bytes.is_empty() {
            return true;
        }
        let last = self.bytes.len() - 1;
        self.bytes[..last] == other.bytes[..last]
            && self.bytes[last] & self.tail_mask() == other.bytes[last] & self.tail_mask()
    }
}

impl Eq for BitSet {}
