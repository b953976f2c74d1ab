//! Pack file writer and reader.
//!
//! A pack is a header (`b"LOAM"` magic plus a format version byte)
//! followed by any sequence of container sections written with
//! [`PackWriter`]. The reader validates the header on open and then
//! hands back sections in the same order they were written; the caller
//! is responsible for knowing that order, the format carries no
//! section directory.

use std::io::{Read, Write};

use bytemuck::Pod;
use loam_bits::BitSet;
use loam_kv::map::HashFn;
use loam_kv::ChainMap;

use crate::codec::{
    read_array, read_bitset, read_chain_map, read_u8, write_array, write_bitset, write_chain_map,
    write_u8,
};
use crate::error::CodecError;
use crate::{FORMAT_VERSION, MAGIC};

/// Writes pack data to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use loam_codec::{PackReader, PackWriter};
///
/// let mut buf = Vec::new();
/// let mut writer = PackWriter::new(&mut buf).unwrap();
/// writer.write_array(&[1.0f32, 2.0, 3.0]).unwrap();
/// assert_eq!(writer.sections_written(), 1);
/// drop(writer);
///
/// let mut reader = PackReader::open(buf.as_slice()).unwrap();
/// let metrics: Vec<f32> = reader.read_array().unwrap();
/// assert_eq!(metrics, [1.0, 2.0, 3.0]);
/// ```
pub struct PackWriter<W: Write> {
    writer: W,
    sections_written: u64,
}

impl<W: Write> PackWriter<W> {
    /// Create a new pack writer, immediately writing the header.
    pub fn new(mut writer: W) -> Result<Self, CodecError> {
        writer.write_all(&MAGIC)?;
        write_u8(&mut writer, FORMAT_VERSION)?;
        Ok(Self {
            writer,
            sections_written: 0,
        })
    }

    /// Write an array section.
    pub fn write_array<T: Pod>(&mut self, elems: &[T]) -> Result<(), CodecError> {
        write_array(&mut self.writer, elems)?;
        self.sections_written += 1;
        Ok(())
    }

    /// Write a bitset section.
    pub fn write_bitset(&mut self, bs: &BitSet) -> Result<(), CodecError> {
        write_bitset(&mut self.writer, bs)?;
        self.sections_written += 1;
        Ok(())
    }

    /// Write a chain map section.
    pub fn write_chain_map<K, V>(&mut self, map: &ChainMap<K, V>) -> Result<(), CodecError>
    where
        K: Pod + Default + PartialEq,
        V: Pod + Default,
    {
        write_chain_map(&mut self.writer, map)?;
        self.sections_written += 1;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of sections written so far.
    pub fn sections_written(&self) -> u64 {
        self.sections_written
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads pack data from a byte stream.
///
/// The header is validated on [`open`](PackReader::open); a wrong
/// magic or an unknown version is rejected before any section is read.
pub struct PackReader<R: Read> {
    reader: R,
    version: u8,
}

impl<R: Read> PackReader<R> {
    /// Open a pack stream, validating magic and version.
    pub fn open(mut reader: R) -> Result<Self, CodecError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(CodecError::InvalidMagic);
        }
        let version = read_u8(&mut reader)?;
        if version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion { found: version });
        }
        Ok(Self { reader, version })
    }

    /// The format version declared in the header.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Read the next section as an array.
    pub fn read_array<T: Pod>(&mut self) -> Result<Vec<T>, CodecError> {
        read_array(&mut self.reader)
    }

    /// Read the next section as a bitset.
    pub fn read_bitset(&mut self) -> Result<BitSet, CodecError> {
        read_bitset(&mut self.reader)
    }

    /// Read the next section as a chain map, rebuilding it with the
    /// given hash function and block capacity.
    pub fn read_chain_map<K, V>(
        &mut self,
        hash: HashFn<K>,
        block_cap: usize,
    ) -> Result<ChainMap<K, V>, CodecError>
    where
        K: Pod + Default + PartialEq,
        V: Pod + Default,
    {
        read_chain_map(&mut self.reader, hash, block_cap)
    }

    /// Consume the reader and return the underlying `Read` source.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_kv::hash_u32;

    #[test]
    fn header_round_trip() {
        let mut buf = Vec::new();
        let writer = PackWriter::new(&mut buf).unwrap();
        assert_eq!(writer.sections_written(), 0);
        drop(writer);
        assert_eq!(&buf[..4], b"LOAM");
        assert_eq!(buf[4], FORMAT_VERSION);

        let reader = PackReader::open(buf.as_slice()).unwrap();
        assert_eq!(reader.version(), FORMAT_VERSION);
    }

    #[test]
    fn mixed_sections_round_trip() {
        let mut active = BitSet::new(12);
        active.set(3);
        active.set(11);
        let mut map: ChainMap<u32, f32> = ChainMap::new(8, 4, hash_u32);
        let _ = map.put(7, 1.5);
        let _ = map.put(9, -0.25);

        let mut buf = Vec::new();
        let mut writer = PackWriter::new(&mut buf).unwrap();
        writer.write_array(&[10i32, 20, 30]).unwrap();
        writer.write_bitset(&active).unwrap();
        writer.write_chain_map(&map).unwrap();
        assert_eq!(writer.sections_written(), 3);
        drop(writer);

        let mut reader = PackReader::open(buf.as_slice()).unwrap();
        let nums: Vec<i32> = reader.read_array().unwrap();
        assert_eq!(nums, [10, 20, 30]);
        let got_bits = reader.read_bitset().unwrap();
        assert_eq!(got_bits, active);
        let got_map: ChainMap<u32, f32> = reader.read_chain_map(hash_u32, 4).unwrap();
        assert_eq!(got_map.get(&7), Some(&1.5));
        assert_eq!(got_map.get(&9), Some(&-0.25));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let buf = b"MOAL\x01".to_vec();
        assert!(matches!(
            PackReader::open(buf.as_slice()),
            Err(CodecError::InvalidMagic)
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut buf = MAGIC.to_vec();
        buf.push(99);
        assert!(matches!(
            PackReader::open(buf.as_slice()),
            Err(CodecError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let buf = b"LO".to_vec();
        assert!(matches!(
            PackReader::open(buf.as_slice()),
            Err(CodecError::Io(_))
        ));
    }
}
