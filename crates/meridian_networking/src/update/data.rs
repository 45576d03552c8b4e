//! # Update Data
//!
//! Per-client, per-broadcast aggregate: fill it with update blocks and
//! out-of-range GUIDs, then send it.
//!
//! ## Example
//!
//! ```rust
//! use meridian_networking::{UpdateData, WorldPacket};
//! use meridian_shared::ObjectGuid;
//!
//! let mut data = UpdateData::new();
//! data.add_update_block(&[0u8; 50]);
//! data.add_out_of_range_guid(ObjectGuid::new(42));
//!
//! let mut session: Vec<WorldPacket> = Vec::new();
//! let stats = data.send_data(&mut session).unwrap();
//! assert_eq!(stats.packets_sent, 1);
//! ```

use meridian_shared::ObjectGuid;

use crate::config::NetworkConfig;
use crate::error::{DeliveryError, PacketBuildError};
use crate::protocol::{ByteBuffer, Compressor, WorldPacket};

use super::{
    DeliveryDispatcher, DispatchStats, OutOfRangeSet, PacketAssembler, PacketSink, SegmentBatch,
};

/// Object updates queued for one client.
#[derive(Clone, Debug, Default)]
pub struct UpdateData {
    segments: SegmentBatch,
    out_of_range: OutOfRangeSet,
    after_create: Vec<WorldPacket>,
    compressor: Compressor,
}

impl UpdateData {
    /// Creates an empty batch compressing at the default level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty batch compressing with `compressor`.
    #[must_use]
    pub fn with_compressor(compressor: Compressor) -> Self {
        Self {
            compressor,
            ..Self::default()
        }
    }

    /// Creates an empty batch compressing at the configured level.
    #[must_use]
    pub fn with_config(config: &NetworkConfig) -> Self {
        Self::with_compressor(Compressor::from_config(config))
    }

    /// Queues one serialized object update block.
    pub fn add_update_block(&mut self, block: &[u8]) {
        self.segments.append_block(block, self.out_of_range.len());
    }

    /// Queues one serialized object update block held in a buffer.
    pub fn add_update_buffer(&mut self, block: &ByteBuffer) {
        self.add_update_block(block.contents());
    }

    /// Marks one object as gone from the client's view.
    pub fn add_out_of_range_guid(&mut self, guid: ObjectGuid) {
        self.out_of_range.add(guid);
    }

    /// Marks several objects as gone from the client's view.
    pub fn add_out_of_range_guids<I>(&mut self, guids: I)
    where
        I: IntoIterator<Item = ObjectGuid>,
    {
        self.out_of_range.add_all(guids);
    }

    /// Queues a prebuilt packet to send after all update packets.
    pub fn add_after_create_packet(&mut self, packet: WorldPacket) {
        self.after_create.push(packet);
    }

    /// Forgets everything queued, ready for the next broadcast.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.out_of_range.clear();
        self.after_create.clear();
    }

    /// Returns true if there are update blocks or out-of-range GUIDs.
    ///
    /// After-create packets alone do not count.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.assembler().has_data()
    }

    /// Number of update packets the batch produces.
    #[must_use]
    pub fn packet_count(&self) -> usize {
        self.segments.segment_count()
    }

    /// The segments built so far.
    #[must_use]
    pub const fn segments(&self) -> &SegmentBatch {
        &self.segments
    }

    /// The out-of-range GUIDs queued so far.
    #[must_use]
    pub const fn out_of_range(&self) -> &OutOfRangeSet {
        &self.out_of_range
    }

    /// The deferred packets queued so far.
    #[must_use]
    pub fn after_create_packets(&self) -> &[WorldPacket] {
        &self.after_create
    }

    /// The compressor used for large packets.
    #[must_use]
    pub const fn compressor(&self) -> &Compressor {
        &self.compressor
    }

    /// An assembler over this batch.
    #[must_use]
    pub const fn assembler(&self) -> PacketAssembler<'_> {
        PacketAssembler::new(&self.segments, &self.out_of_range, &self.compressor)
    }

    /// Builds the packet for segment `index`, empty on failure.
    #[must_use]
    pub fn build_packet(&self, index: usize) -> WorldPacket {
        self.assembler().build_packet(index)
    }

    /// Builds the packet for segment `index`.
    ///
    /// # Errors
    ///
    /// See [`PacketAssembler::try_build_packet`].
    pub fn try_build_packet(&self, index: usize) -> Result<WorldPacket, PacketBuildError> {
        self.assembler().try_build_packet(index)
    }

    /// Sends every update packet, then every after-create packet.
    ///
    /// # Errors
    ///
    /// Returns the first sink failure.
    pub fn send_data<S>(&self, sink: &mut S) -> Result<DispatchStats, DeliveryError>
    where
        S: PacketSink + ?Sized,
    {
        DeliveryDispatcher::new(self.assembler(), &self.after_create).dispatch(sink)
    }
}
