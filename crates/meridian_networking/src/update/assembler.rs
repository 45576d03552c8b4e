//! # Packet Assembler
//!
//! Frames one segment as a client packet.
//!
//! ## Layout
//!
//! ```text
//! payload  = [u32 block count][out-of-range block, segment 0 only][segment bytes]
//!
//! raw      = payload                                   SMSG_UPDATE_OBJECT
//! deflated = [u32 payload len][zlib(payload)]          SMSG_COMPRESSED_UPDATE_OBJECT
//! ```
//!
//! The out-of-range block counts as one block and is carried by the first
//! packet of the batch only.

use meridian_shared::{Opcode, COMPRESSION_THRESHOLD};

use crate::error::PacketBuildError;
use crate::protocol::{compress_bound, ByteBuffer, Compressor, WorldPacket};

use super::{OutOfRangeSet, Segment, SegmentBatch};

/// Size of the uncompressed-length prefix of a deflated packet.
const SIZE_PREFIX: usize = std::mem::size_of::<u32>();

/// Builds packets from a borrowed batch.
#[derive(Clone, Copy, Debug)]
pub struct PacketAssembler<'a> {
    segments: &'a SegmentBatch,
    out_of_range: &'a OutOfRangeSet,
    compressor: &'a Compressor,
}

impl<'a> PacketAssembler<'a> {
    /// Creates an assembler over a batch.
    #[must_use]
    pub const fn new(
        segments: &'a SegmentBatch,
        out_of_range: &'a OutOfRangeSet,
        compressor: &'a Compressor,
    ) -> Self {
        Self {
            segments,
            out_of_range,
            compressor,
        }
    }

    /// Number of packets this batch produces.
    #[inline]
    #[must_use]
    pub fn packet_count(&self) -> usize {
        self.segments.segment_count()
    }

    /// Returns true if there is anything to tell the client.
    #[inline]
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.segments.has_blocks() || !self.out_of_range.is_empty()
    }

    /// Builds the pre-compression payload of segment `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PacketBuildError::SegmentOutOfRange`] for a bad index.
    pub fn build_payload(&self, index: usize) -> Result<ByteBuffer, PacketBuildError> {
        let segment = self.segment(index)?;
        let carries_out_of_range = index == 0 && !self.out_of_range.is_empty();

        let reserve = SIZE_PREFIX
            + if carries_out_of_range {
                self.out_of_range.worst_case_block_size()
            } else {
                0
            }
            + segment.len();
        let mut payload = ByteBuffer::with_capacity(reserve);

        let block_count = segment.block_count() + u32::from(carries_out_of_range);
        payload.write_u32(block_count);

        if carries_out_of_range {
            self.out_of_range.write_block(&mut payload);
        }

        payload.append_buffer(segment.buffer());
        Ok(payload)
    }

    /// Builds the packet for segment `index`.
    ///
    /// Payloads over [`COMPRESSION_THRESHOLD`] bytes are deflated.
    ///
    /// # Errors
    ///
    /// Returns [`PacketBuildError::SegmentOutOfRange`] for a bad index and
    /// [`PacketBuildError::Compression`] when deflate fails. Neither result
    /// may be sent.
    pub fn try_build_packet(&self, index: usize) -> Result<WorldPacket, PacketBuildError> {
        let payload = self.build_payload(index)?;

        if payload.len() <= COMPRESSION_THRESHOLD {
            return Ok(WorldPacket::from_payload(Opcode::SMSG_UPDATE_OBJECT, payload));
        }

        let source_len = payload.len();
        let mut packet = WorldPacket::with_capacity(
            Opcode::SMSG_COMPRESSED_UPDATE_OBJECT,
            SIZE_PREFIX + compress_bound(source_len),
        );

        let buf = packet.buffer_mut();
        buf.write_u32(u32::try_from(source_len).unwrap_or(u32::MAX));
        buf.resize(SIZE_PREFIX + compress_bound(source_len));

        let written = self
            .compressor
            .compress(payload.contents(), &mut buf.contents_mut()[SIZE_PREFIX..])?;
        buf.resize(SIZE_PREFIX + written);

        tracing::debug!(
            segment = index,
            raw = source_len,
            deflated = written,
            "Compressed update packet"
        );

        Ok(packet)
    }

    /// Builds the packet for segment `index`, empty on failure.
    ///
    /// An empty packet is never a valid update and must not be sent; callers
    /// that need the reason use [`PacketAssembler::try_build_packet`].
    #[must_use]
    pub fn build_packet(&self, index: usize) -> WorldPacket {
        self.try_build_packet(index).unwrap_or_else(|err| {
            tracing::error!(segment = index, "Update packet not built: {err}");
            WorldPacket::default()
        })
    }

    fn segment(&self, index: usize) -> Result<&'a Segment, PacketBuildError> {
        self.segments
            .segment(index)
            .ok_or(PacketBuildError::SegmentOutOfRange {
                index,
                count: self.segments.segment_count(),
            })
    }
}
