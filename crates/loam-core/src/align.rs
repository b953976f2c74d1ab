//! Power-of-two alignment arithmetic.
//!
//! The arena allocators align every allocation against the real base
//! address of their backing storage, so these helpers operate on plain
//! `usize` values that may be addresses or logical offsets.

/// Round `value` up to the next multiple of `align`.
///
/// `align` must be a power of two. Returns `value` unchanged when it is
/// already aligned.
///
/// # Panics
///
/// Panics if `align` is not a power of two.
#[inline]
pub const fn align_forward(value: usize, align: usize) -> usize {
    assert!(align.is_power_of_two(), "alignment must be a power of two");
    (value + align - 1) & !(align - 1)
}

/// Whether `value` is a multiple of the power-of-two `align`.
///
/// # Panics
///
/// Panics if `align` is not a power of two.
#[inline]
pub const fn is_aligned(value: usize, align: usize) -> bool {
    assert!(align.is_power_of_two(), "alignment must be a power of two");
    value & (align - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn already_aligned_is_unchanged() {
        assert_eq!(align_forward(0, 8), 0);
        assert_eq!(align_forward(8, 8), 8);
        assert_eq!(align_forward(64, 16), 64);
    }

    #[test]
    fn rounds_up_to_next_multiple() {
        assert_eq!(align_forward(1, 8), 8);
        assert_eq!(align_forward(9, 8), 16);
        assert_eq!(align_forward(17, 16), 32);
    }

    #[test]
    fn align_one_is_identity() {
        for v in [0usize, 1, 7, 13, 255] {
            assert_eq!(align_forward(v, 1), v);
            assert!(is_aligned(v, 1));
        }
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn non_power_of_two_rejected() {
        align_forward(10, 12);
    }

    proptest! {
        #[test]
        fn result_is_aligned_and_minimal(v in 0usize..1 << 40, shift in 0u32..16) {
            let align = 1usize << shift;
            let r = align_forward(v, align);
            prop_assert!(is_aligned(r, align));
            prop_assert!(r >= v);
            prop_assert!(r - v < align);
        }
    }
}
