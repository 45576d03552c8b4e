//! # Byte Buffer
//!
//! Append-only growable buffer used for update blocks, segments and packet
//! payloads.
//!
//! ## Design
//!
//! - Single owner, no shared views
//! - The write position is the end of the written region, every write lands
//!   there and advances it
//! - Integers are written little-endian regardless of host

use bytemuck::{bytes_of, Pod};

/// Growable byte buffer with a running write position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    storage: Vec<u8>,
}

impl ByteBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { storage: Vec::new() }
    }

    /// Creates an empty buffer with room for `reserve` bytes.
    #[must_use]
    pub fn with_capacity(reserve: usize) -> Self {
        Self {
            storage: Vec::with_capacity(reserve),
        }
    }

    /// Current write position, equal to the number of bytes written.
    #[inline]
    #[must_use]
    pub fn wpos(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the written bytes.
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.storage
    }

    /// Returns the written bytes for in-place edits.
    #[inline]
    pub fn contents_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// Appends raw bytes.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.storage.extend_from_slice(bytes);
    }

    /// Appends the written region of another buffer.
    #[inline]
    pub fn append_buffer(&mut self, other: &Self) {
        self.append(other.contents());
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.storage.push(value);
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.append(&value.to_le_bytes());
    }

    /// Writes a Pod value in its in-memory layout.
    #[inline]
    pub fn write_pod<T: Pod>(&mut self, value: &T) {
        self.append(bytes_of(value));
    }

    /// Overwrites four bytes at `pos` with a little-endian u32.
    ///
    /// # Panics
    ///
    /// Panics if `pos + 4` is past the write position.
    pub fn put_u32(&mut self, pos: usize, value: u32) {
        self.storage[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Grows (zero-filled) or truncates the written region to `len` bytes.
    pub fn resize(&mut self, len: usize) {
        self.storage.resize(len, 0);
    }

    /// Forgets all written bytes, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Consumes the buffer and returns the written bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.storage
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(storage: Vec<u8>) -> Self {
        Self { storage }
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            storage: bytes.to_vec(),
        }
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.storage
    }
}
