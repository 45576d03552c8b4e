//! # World Packets
//!
//! A finished payload plus the opcode the session frames it with.

use meridian_shared::Opcode;

use super::ByteBuffer;

/// A packet ready for a client session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldPacket {
    opcode: Opcode,
    buffer: ByteBuffer,
}

impl WorldPacket {
    /// Creates an empty packet with the given opcode.
    #[must_use]
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            buffer: ByteBuffer::new(),
        }
    }

    /// Creates an empty packet with room for `reserve` payload bytes.
    #[must_use]
    pub fn with_capacity(opcode: Opcode, reserve: usize) -> Self {
        Self {
            opcode,
            buffer: ByteBuffer::with_capacity(reserve),
        }
    }

    /// Creates a packet around an existing payload.
    #[must_use]
    pub const fn from_payload(opcode: Opcode, buffer: ByteBuffer) -> Self {
        Self { opcode, buffer }
    }

    /// Returns the opcode.
    #[inline]
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Replaces the opcode.
    #[inline]
    pub fn set_opcode(&mut self, opcode: Opcode) {
        self.opcode = opcode;
    }

    /// Returns the payload buffer.
    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    /// Returns the payload buffer for writing.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut ByteBuffer {
        &mut self.buffer
    }

    /// Returns the payload bytes.
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        self.buffer.contents()
    }

    /// Payload size in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if the packet has no payload.
    ///
    /// An update packet is never legitimately empty, so an empty update
    /// packet marks a failed build.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
