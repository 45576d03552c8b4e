//! # Opcodes and Update Markers
//!
//! Only the opcodes the update pipeline chooses between are named here.
//! Other packets carry whatever opcode their builder assigned.

use std::fmt;

/// Server message opcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Placeholder opcode of a packet nobody framed yet.
    pub const NULL_ACTION: Self = Self(0x000);
    /// Uncompressed object update batch.
    pub const SMSG_UPDATE_OBJECT: Self = Self(0x0A9);
    /// Deflated object update batch with a 4-byte size prefix.
    pub const SMSG_COMPRESSED_UPDATE_OBJECT: Self = Self(0x1F6);

    /// Returns the raw opcode value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns true for either flavour of object update.
    #[inline]
    #[must_use]
    pub const fn is_update_object(self) -> bool {
        self.0 == Self::SMSG_UPDATE_OBJECT.0 || self.0 == Self::SMSG_COMPRESSED_UPDATE_OBJECT.0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NULL_ACTION => f.write_str("MSG_NULL_ACTION"),
            Self::SMSG_UPDATE_OBJECT => f.write_str("SMSG_UPDATE_OBJECT"),
            Self::SMSG_COMPRESSED_UPDATE_OBJECT => f.write_str("SMSG_COMPRESSED_UPDATE_OBJECT"),
            Self(raw) => write!(f, "0x{raw:03X}"),
        }
    }
}

/// Block type marker at the start of every block inside an update packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UpdateType {
    /// Field values changed.
    Values = 0,
    /// Movement only.
    Movement = 1,
    /// Object created.
    CreateObject = 2,
    /// Object created and spawned in view.
    CreateObject2 = 3,
    /// Objects that left the client's view.
    OutOfRangeObjects = 4,
    /// Objects that came into view.
    NearObjects = 5,
}

impl UpdateType {
    /// Returns the marker byte.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
