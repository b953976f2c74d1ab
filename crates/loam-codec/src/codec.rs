//! Encode/decode for the container wire formats.
//!
//! - Array: `[len: i32][element bytes...]`
//! - BitSet: `[bit_cnt: i32][ceil(bit_cnt / 8) bytes]`. The undefined
//!   trailing bits of the final byte are written as stored and ignored
//!   on read; the round-trip contract is logical bit equality, not
//!   byte equality.
//! - ChainMap: `[bucket_cap: i32][entry_cnt: i32][keys array][values
//!   array]`. Rebuilt by re-inserting each pair on read, so the
//!   internal chain layout is not persisted and need not match the
//!   writer's.

use std::io::{Read, Write};

use bytemuck::Pod;
use loam_bits::BitSet;
use loam_kv::map::HashFn;
use loam_kv::ChainMap;

use crate::error::CodecError;

// ── Primitive writers/readers ───────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CodecError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, CodecError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a non-negative little-endian i32 length/count field.
fn read_count(r: &mut dyn Read, what: &str) -> Result<usize, CodecError> {
    let v = read_i32_le(r)?;
    if v < 0 {
        return Err(CodecError::Malformed {
            detail: format!("negative {what}: {v}"),
        });
    }
    Ok(v as usize)
}

// ── Arrays ──────────────────────────────────────────────────────

/// Write a `Pod` element array as `[len: i32][element bytes]`.
///
/// # Panics
///
/// Panics if `elems.len()` exceeds `i32::MAX`.
pub fn write_array<T: Pod>(w: &mut dyn Write, elems: &[T]) -> Result<(), CodecError> {
    let len = i32::try_from(elems.len()).expect("array length exceeds i32");
    write_i32_le(w, len)?;
    w.write_all(bytemuck::cast_slice(elems))?;
    Ok(())
}

/// Read a `Pod` element array written by [`write_array`].
pub fn read_array<T: Pod>(r: &mut dyn Read) -> Result<Vec<T>, CodecError> {
    let len = read_count(r, "array length")?;
    let elem = std::mem::size_of::<T>();
    let mut bytes = vec![0u8; len * elem];
    r.read_exact(&mut bytes)?;
    // Decode per element: the scratch buffer carries no alignment
    // guarantee for T.
    let mut out = Vec::with_capacity(len);
    for chunk in bytes.chunks_exact(elem) {
        out.push(bytemuck::pod_read_unaligned(chunk));
    }
    Ok(out)
}

// ── Bitsets ─────────────────────────────────────────────────────

/// Write a bitset as `[bit_cnt: i32][packed bytes]`.
///
/// Only `ceil(bit_cnt / 8)` bytes are written; trailing bits of the
/// final byte go out as stored, without canonicalization.
///
/// # Panics
///
/// Panics if the bit count exceeds `i32::MAX`.
pub fn write_bitset(w: &mut dyn Write, bs: &BitSet) -> Result<(), CodecError> {
    let bit_cnt = i32::try_from(bs.bit_cnt()).expect("bit count exceeds i32");
    write_i32_le(w, bit_cnt)?;
    w.write_all(bs.as_bytes())?;
    Ok(())
}

/// Read a bitset written by [`write_bitset`].
pub fn read_bitset(r: &mut dyn Read) -> Result<BitSet, CodecError> {
    let bit_cnt = read_count(r, "bit count")?;
    let mut bytes = vec![0u8; bit_cnt.div_ceil(8)];
    r.read_exact(&mut bytes)?;
    Ok(BitSet::from_bytes(bytes, bit_cnt))
}

// ── Chain maps ──────────────────────────────────────────────────

/// Write a chain map as `[bucket_cap: i32][entry_cnt: i32][keys
/// array][values array]`.
///
/// Entries go out in chain-walk order; the order is not part of the
/// format contract.
pub fn write_chain_map<K, V>(w: &mut dyn Write, map: &ChainMap<K, V>) -> Result<(), CodecError>
where
    K: Pod + Default + PartialEq,
    V: Pod + Default,
{
    let bucket_cap = i32::try_from(map.bucket_count()).expect("bucket count exceeds i32");
    let entry_cnt = i32::try_from(map.len()).expect("entry count exceeds i32");
    write_i32_le(w, bucket_cap)?;
    write_i32_le(w, entry_cnt)?;

    let entries = map.entries();
    let keys: Vec<K> = entries.iter().map(|(k, _)| *k).collect();
    let vals: Vec<V> = entries.iter().map(|(_, v)| *v).collect();
    write_array(w, &keys)?;
    write_array(w, &vals)?;
    Ok(())
}

/// Read a chain map written by [`write_chain_map`].
///
/// The format does not carry the hash function or block capacity, so
/// the caller supplies both; the map is rebuilt by re-inserting every
/// pair, which may produce a different internal chain layout than the
/// writer had.
pub fn read_chain_map<K, V>(
    r: &mut dyn Read,
    hash: HashFn<K>,
    block_cap: usize,
) -> Result<ChainMap<K, V>, CodecError>
where
    K: Pod + Default + PartialEq,
    V: Pod + Default,
{
    let bucket_cap = read_count(r, "bucket count")?;
    if bucket_cap == 0 {
        return Err(CodecError::Malformed {
            detail: "zero bucket count".into(),
        });
    }
    let entry_cnt = read_count(r, "entry count")?;
    let keys: Vec<K> = read_array(r)?;
    let vals: Vec<V> = read_array(r)?;
    if keys.len() != entry_cnt || vals.len() != entry_cnt {
        return Err(CodecError::Malformed {
            detail: format!(
                "entry count {entry_cnt} does not match {} keys / {} values",
                keys.len(),
                vals.len()
            ),
        });
    }

    let mut map = ChainMap::new(bucket_cap, block_cap, hash);
    for (k, v) in keys.into_iter().zip(vals) {
        let _ = map.put(k, v);
    }
    Ok(map)
}
