//! Default hash functions.
//!
//! Hashes return `u64`, so the "a hash must never be negative"
//! requirement holds structurally; bucket selection is a plain modulo
//! over the bucket table size.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over a byte slice.
pub fn fnv1a_bytes(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// FNV-1a over a `u32` key (little-endian bytes). Usable directly as a
/// [`ChainMap`](crate::ChainMap) hash function.
pub fn hash_u32(key: &u32) -> u64 {
    fnv1a_bytes(&key.to_le_bytes())
}

/// FNV-1a over a `u64` key (little-endian bytes).
pub fn hash_u64(key: &u64) -> u64 {
    fnv1a_bytes(&key.to_le_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_fnv1a_vectors() {
        // Reference values for the 64-bit FNV-1a parameters.
        assert_eq!(fnv1a_bytes(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_bytes(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a_bytes(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn integer_helpers_distinguish_nearby_keys() {
        assert_ne!(hash_u32(&1), hash_u32(&2));
        assert_ne!(hash_u64(&1), hash_u64(&2));
        // The u32 and u64 renderings of the same value hash differently
        // (different byte lengths feed the accumulator).
        assert_ne!(hash_u32(&7), hash_u64(&7));
    }
}
