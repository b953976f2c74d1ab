//! The chained hash map.
//!
//! Layout: a fixed bucket table of chain-head indices plus a list of
//! fixed-capacity storage blocks. Each block holds parallel arrays of
//! keys, values, and `next` links, with a usage bitset marking live
//! slots. A slot is addressed globally as
//! `block_index * block_cap + slot_in_block`; `-1` terminates chains
//! and marks empty buckets.
//!
//! The bucket table never grows — a degenerate hash degrades to long
//! chains, it never fails. The block list grows by appending; removal
//! clears a usage bit, and the freed slot is found again by the
//! first-unset-bit scan of a later insert.

use loam_bits::BitSet;

/// Chain terminator and empty-bucket marker.
const CHAIN_END: i32 = -1;

/// Hash function for keys of type `K`. Unsigned by construction.
pub type HashFn<K> = fn(&K) -> u64;

/// Whether a `put` inserted a new entry or overwrote an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum PutOutcome {
    /// The key was not present; a new entry was created.
    Added,
    /// The key was present; its value was replaced.
    Updated,
}

/// One fixed-capacity storage block of parallel entry arrays.
struct KvBlock<K, V> {
    keys: Vec<K>,
    vals: Vec<V>,
    next: Vec<i32>,
    usage: BitSet,
}

impl<K: Clone + Default, V: Clone + Default> KvBlock<K, V> {
    fn new(cap: usize) -> Self {
        Self {
            keys: vec![K::default(); cap],
            vals: vec![V::default(); cap],
            next: vec![CHAIN_END; cap],
            usage: BitSet::new(cap),
        }
    }
}

/// Hash map with separate chaining through block-stored index links.
pub struct ChainMap<K, V> {
    /// Bucket table: head slot index per bucket, `-1` when empty.
    heads: Vec<i32>,
    blocks: Vec<KvBlock<K, V>>,
    block_cap: usize,
    len: usize,
    hash: HashFn<K>,
}

impl<K, V> ChainMap<K, V>
where
    K: Clone + Default + PartialEq,
    V: Clone + Default,
{
    /// Create a map with `bucket_cap` buckets and storage blocks of
    /// `block_cap` slots each. No block is allocated until the first
    /// insert.
    ///
    /// # Panics
    ///
    /// Panics if either capacity is zero.
    pub fn new(bucket_cap: usize, block_cap: usize, hash: HashFn<K>) -> Self {
        assert!(bucket_cap > 0, "bucket capacity must be non-zero");
        assert!(block_cap > 0, "block capacity must be non-zero");
        Self {
            heads: vec![CHAIN_END; bucket_cap],
            blocks: Vec::new(),
            block_cap,
            len: 0,
            hash,
        }
    }

    /// Insert or overwrite the entry for `key`.
    pub fn put(&mut self, key: K, value: V) -> PutOutcome {
        let bucket = self.bucket_of(&key);
        if let Some(slot) = self.find_slot(bucket, &key) {
            let (b, i) = self.split(slot);
            self.blocks[b].vals[i] = value;
            return PutOutcome::Updated;
        }

        let slot = self.claim_free_slot();
        let (b, i) = self.split(slot);
        let head = self.heads[bucket];
        let block = &mut self.blocks[b];
        block.keys[i] = key;
        block.vals[i] = value;
        block.usage.set(i);
        block.next[i] = head;
        self.heads[bucket] = slot;
        self.len += 1;
        PutOutcome::Added
    }

    /// Look up the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let bucket = self.bucket_of(key);
        let slot = self.find_slot(bucket, key)?;
        let (b, i) = self.split(slot);
        Some(&self.blocks[b].vals[i])
    }

    /// Look up the value for `key`, mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let bucket = self.bucket_of(key);
        let slot = self.find_slot(bucket, key)?;
        let (b, i) = self.split(slot);
        Some(&mut self.blocks[b].vals[i])
    }

    /// Whether `key` has an entry.
    pub fn contains_key(&self, key: &K) -> bool {
        let bucket = self.bucket_of(key);
        self.find_slot(bucket, key).is_some()
    }

    /// Remove and return the entry for `key`.
    ///
    /// Unlinks the slot from its chain and clears its usage bit; no
    /// other entry moves. The freed slot is reused by a later insert.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let bucket = self.bucket_of(key);
        let mut prev = CHAIN_END;
        let mut cur = self.heads[bucket];
        while cur != CHAIN_END {
            let (b, i) = self.split(cur);
            if self.blocks[b].keys[i] == *key {
                let after = self.blocks[b].next[i];
                if prev == CHAIN_END {
                    self.heads[bucket] = after;
                } else {
                    let (pb, pi) = self.split(prev);
                    self.blocks[pb].next[pi] = after;
                }
                let block = &mut self.blocks[b];
                block.usage.unset(i);
                block.next[i] = CHAIN_END;
                block.keys[i] = K::default();
                self.len -= 1;
                return Some(std::mem::take(&mut block.vals[i]));
            }
            prev = cur;
            cur = self.blocks[b].next[i];
        }
        None
    }

    /// Copy out every entry, walking each bucket's chain in order.
    ///
    /// The order depends on hash distribution and insertion history; it
    /// is stable for a given map state but not meaningful. This is the
    /// full-map export used by serialization.
    pub fn entries(&self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.len);
        for &head in &self.heads {
            let mut cur = head;
            while cur != CHAIN_END {
                let (b, i) = self.split(cur);
                out.push((self.blocks[b].keys[i].clone(), self.blocks[b].vals[i].clone()));
                cur = self.blocks[b].next[i];
            }
        }
        out
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the (fixed) bucket table.
    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    /// Number of storage blocks currently allocated.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Slots per storage block.
    pub fn block_cap(&self) -> usize {
        self.block_cap
    }

    /// The configured hash function.
    pub fn hash_fn(&self) -> HashFn<K> {
        self.hash
    }

    fn bucket_of(&self, key: &K) -> usize {
        ((self.hash)(key) % self.heads.len() as u64) as usize
    }

    /// Walk `bucket`'s chain for `key`; returns the global slot index.
    fn find_slot(&self, bucket: usize, key: &K) -> Option<i32> {
        let mut cur = self.heads[bucket];
        while cur != CHAIN_END {
            let (b, i) = self.split(cur);
            if self.blocks[b].keys[i] == *key {
                return Some(cur);
            }
            cur = self.blocks[b].next[i];
        }
        None
    }

    /// First free slot across existing blocks, appending a block when
    /// every slot is in use.
    fn claim_free_slot(&mut self) -> i32 {
        for (bi, block) in self.blocks.iter().enumerate() {
            if let Some(i) = block.usage.first_unset(0) {
                return (bi * self.block_cap + i) as i32;
            }
        }
        let total = (self.blocks.len() + 1) * self.block_cap;
        assert!(
            total <= i32::MAX as usize,
            "slot index space exhausted ({total} slots)"
        );
        self.blocks.push(KvBlock::new(self.block_cap));
        ((self.blocks.len() - 1) * self.block_cap) as i32
    }

    fn split(&self, slot: i32) -> (usize, usize) {
        let slot = slot as usize;
        (slot / self.block_cap, slot % self.block_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_u32;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    fn small_map() -> ChainMap<u32, u64> {
        ChainMap::new(8, 4, hash_u32)
    }

    #[test]
    fn put_then_get() {
        let mut map = small_map();
        assert_eq!(map.put(1, 100), PutOutcome::Added);
        assert_eq!(map.put(2, 200), PutOutcome::Added);
        assert_eq!(map.get(&1), Some(&100));
        assert_eq!(map.get(&2), Some(&200));
        assert_eq!(map.get(&3), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn second_put_updates_without_growing() {
        let mut map = small_map();
        let _ = map.put(7, 1);
        assert_eq!(map.put(7, 2), PutOutcome::Updated);
        assert_eq!(map.get(&7), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn remove_then_get_reports_missing() {
        let mut map = small_map();
        let _ = map.put(5, 50);
        assert_eq!(map.remove(&5), Some(50));
        assert_eq!(map.get(&5), None);
        assert_eq!(map.len(), 0);
        assert_eq!(map.remove(&5), None);
    }

    #[test]
    fn readd_after_remove_reuses_slot() {
        let mut map = small_map();
        let _ = map.put(5, 50);
        let _ = map.put(6, 60);
        let _ = map.remove(&5);
        assert_eq!(map.put(9, 90), PutOutcome::Added);
        // Block capacity is 4 and only two live entries plus a freed
        // slot exist, so no second block should have been needed.
        assert_eq!(map.block_count(), 1);
        assert_eq!(map.get(&6), Some(&60));
        assert_eq!(map.get(&9), Some(&90));
    }

    #[test]
    fn colliding_keys_chain_beyond_one_slot() {
        // Degenerate hash: every key lands in bucket 0.
        let mut map: ChainMap<u32, u32> = ChainMap::new(4, 2, |_| 0);
        for k in 0..5 {
            let _ = map.put(k, k * 10);
        }
        assert_eq!(map.len(), 5);
        for k in 0..5 {
            assert_eq!(map.get(&k), Some(&(k * 10)), "key {k}");
        }
        // 5 entries at 2 slots per block need 3 blocks.
        assert_eq!(map.block_count(), 3);
    }

    #[test]
    fn removing_mid_chain_preserves_neighbours() {
        let mut map: ChainMap<u32, u32> = ChainMap::new(1, 8, |_| 0);
        for k in 0..5 {
            let _ = map.put(k, k + 100);
        }
        assert_eq!(map.remove(&2), Some(102));
        for k in [0u32, 1, 3, 4] {
            assert_eq!(map.get(&k), Some(&(k + 100)), "key {k}");
        }
    }

    #[test]
    fn removing_chain_head_relinks_bucket() {
        let mut map: ChainMap<u32, u32> = ChainMap::new(1, 8, |_| 0);
        let _ = map.put(1, 10);
        let _ = map.put(2, 20); // new chain head
        assert_eq!(map.remove(&2), Some(20));
        assert_eq!(map.get(&1), Some(&10));
    }

    #[test]
    fn entries_exports_every_pair() {
        let mut map = small_map();
        for k in 0..10u32 {
            let _ = map.put(k, k as u64 * 3);
        }
        let mut entries = map.entries();
        entries.sort_unstable();
        let expect: Vec<(u32, u64)> = (0..10).map(|k| (k, k as u64 * 3)).collect();
        assert_eq!(entries, expect);
    }

    #[test]
    fn no_blocks_until_first_insert() {
        let map = small_map();
        assert_eq!(map.block_count(), 0);
        assert!(map.is_empty());
    }

    // ── Model-based suite against IndexMap ──────────────────────

    #[derive(Clone, Debug)]
    enum Op {
        Put(u32, u64),
        Remove(u32),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..32, any::<u64>()).prop_map(|(k, v)| Op::Put(k, v)),
            (0u32..32).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn behaves_like_reference_map(ops in prop::collection::vec(arb_op(), 0..200)) {
            let mut map: ChainMap<u32, u64> = ChainMap::new(4, 4, hash_u32);
            let mut model: IndexMap<u32, u64> = IndexMap::new();
            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        let outcome = map.put(k, v);
                        let existed = model.insert(k, v).is_some();
                        prop_assert_eq!(
                            outcome,
                            if existed { PutOutcome::Updated } else { PutOutcome::Added }
                        );
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(map.remove(&k), model.shift_remove(&k));
                    }
                }
                prop_assert_eq!(map.len(), model.len());
            }
            for (k, v) in &model {
                prop_assert_eq!(map.get(k), Some(v));
            }
            let mut entries = map.entries();
            entries.sort_unstable();
            let mut expect: Vec<(u32, u64)> = model.iter().map(|(k, v)| (*k, *v)).collect();
            expect.sort_unstable();
            prop_assert_eq!(entries, expect);
        }
    }
}
