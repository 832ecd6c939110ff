//! Cursor-style reader for the binary request descriptor.
//!
//! All integers travel as unsigned 64-bit little-endian values. Strings
//! carry a length prefix followed by UTF-8 bytes, containers an entry
//! count followed by that many records. Every read is bounds-checked
//! against the buffer and the configured limits before any allocation.

use bytes::Buf;

use crate::error::{Error, Result};
use crate::files::FileIncoming;
use crate::multimap::MultiMap;
use crate::Config;

/// Bounds-checked reader over a descriptor buffer.
///
/// The reader consumes the buffer front to back. Field order is fixed
/// by the producer contract; the reader validates sizes, not ordering.
pub struct Reader<'a> {
    buf: &'a [u8],
    max_field_bytes: usize,
    max_container_entries: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8], config: &Config) -> Self {
        Self {
            buf,
            max_field_bytes: config.max_field_bytes,
            max_container_entries: config.max_container_entries,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(Error::Truncated { needed, remaining });
        }
        Ok(())
    }

    /// Read a fixed 8-byte little-endian integer
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.buf.get_u64_le())
    }

    /// Read an 8-byte integer that must fit in 32 bits
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self.read_u64()?;
        u32::try_from(value).map_err(|_| Error::Malformed("integer out of u32 range"))
    }

    /// Read an opaque address-sized token
    pub fn read_handle(&mut self) -> Result<u64> {
        self.read_u64()
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u64()?;
        if len > self.max_field_bytes as u64 {
            return Err(Error::Oversized("string length prefix"));
        }
        let len = len as usize;
        self.ensure(len)?;
        let mut raw = vec![0u8; len];
        self.buf.copy_to_slice(&mut raw);
        String::from_utf8(raw).map_err(|_| Error::Malformed("string field is not valid UTF-8"))
    }

    /// Read a container entry count
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.read_u64()?;
        if count > self.max_container_entries as u64 {
            return Err(Error::Oversized("container entry count"));
        }
        Ok(count as usize)
    }

    /// Read an ordered list of string pairs
    pub fn read_pairs(&mut self) -> Result<Vec<(String, String)>> {
        let count = self.read_count()?;
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.read_string()?;
            pairs.push((key, value));
        }
        Ok(pairs)
    }

    /// Read string pairs into an insertion-ordered multimap
    pub fn read_multimap(&mut self) -> Result<MultiMap> {
        let count = self.read_count()?;
        let mut map = MultiMap::with_capacity(count);
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.read_string()?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// Read uploaded-file records keyed by form field name
    pub fn read_files(&mut self) -> Result<MultiMap<FileIncoming>> {
        let count = self.read_count()?;
        let mut map = MultiMap::with_capacity(count);
        for _ in 0..count {
            let name = self.read_string()?;
            let temp_path = self.read_string()?;
            let size = self.read_u64()?;
            map.insert(name, FileIncoming::new(temp_path, size));
        }
        Ok(map)
    }
}
