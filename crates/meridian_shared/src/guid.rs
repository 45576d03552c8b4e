//! # Object Identifiers
//!
//! 64-bit entity identifiers and their packed wire form.
//!
//! ## Packed Encoding
//!
//! ```text
//! ┌──────┬─────────────────────────────────────┐
//! │ mask │ non-zero value bytes, low to high   │
//! └──────┴─────────────────────────────────────┘
//! ```
//!
//! Bit `i` of the mask is set when byte `i` of the little-endian value is
//! non-zero and present. A zero GUID packs to a single zero mask byte.

use bytemuck::{Pod, Zeroable};
use std::fmt;

use crate::constants::PACKED_GUID_MAX_SIZE;

/// Unique identifier of a world object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct ObjectGuid(pub u64);

impl ObjectGuid {
    /// The empty GUID.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw 64-bit value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw 64-bit value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns true for the empty GUID.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Encodes this GUID in packed form.
    #[must_use]
    pub fn write_as_packed(self) -> PackedGuid {
        let mut packed = PackedGuid {
            bytes: [0u8; PACKED_GUID_MAX_SIZE],
            len: 1,
        };

        for (i, byte) in self.0.to_le_bytes().into_iter().enumerate() {
            if byte != 0 {
                packed.bytes[0] |= 1 << i;
                packed.bytes[packed.len] = byte;
                packed.len += 1;
            }
        }

        packed
    }

    /// Decodes a packed GUID from the front of `input`.
    ///
    /// Returns the GUID and the number of bytes consumed, or `None` if
    /// `input` is shorter than the mask announces.
    #[must_use]
    pub fn read_packed(input: &[u8]) -> Option<(Self, usize)> {
        let (&mask, rest) = input.split_first()?;
        let mut value = [0u8; 8];
        let mut consumed = 0;

        for (i, slot) in value.iter_mut().enumerate() {
            if mask & (1 << i) != 0 {
                *slot = *rest.get(consumed)?;
                consumed += 1;
            }
        }

        Some((Self(u64::from_le_bytes(value)), consumed + 1))
    }
}

impl From<u64> for ObjectGuid {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

/// Packed form of an [`ObjectGuid`], between 1 and 9 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedGuid {
    bytes: [u8; PACKED_GUID_MAX_SIZE],
    len: usize,
}

impl PackedGuid {
    /// Returns the encoded bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Returns the encoded length.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false, a packed GUID holds at least its mask.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}
