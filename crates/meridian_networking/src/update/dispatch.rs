//! # Delivery
//!
//! Hands a batch's packets to a client in wire order: every segment packet
//! in segment order, then the deferred after-create packets in the order
//! they were queued.

use crossbeam_channel::{Receiver, Sender};
use meridian_shared::Opcode;

use crate::error::DeliveryError;
use crate::protocol::WorldPacket;

use super::PacketAssembler;

/// Destination for finished packets, usually a client session.
///
/// The sink owns the actual I/O, backpressure and connection lifetime.
pub trait PacketSink {
    /// Queues one packet for the client.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the client can no longer receive.
    fn send_packet(&mut self, packet: WorldPacket) -> Result<(), DeliveryError>;
}

impl PacketSink for Vec<WorldPacket> {
    fn send_packet(&mut self, packet: WorldPacket) -> Result<(), DeliveryError> {
        self.push(packet);
        Ok(())
    }
}

/// Sink feeding a session thread through a crossbeam channel.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: Sender<WorldPacket>,
}

impl ChannelSink {
    /// Wraps an existing sender.
    #[must_use]
    pub const fn new(sender: Sender<WorldPacket>) -> Self {
        Self { sender }
    }

    /// Creates a sink and the receiver a session drains.
    ///
    /// `capacity` of `None` gives an unbounded channel.
    #[must_use]
    pub fn channel(capacity: Option<usize>) -> (Self, Receiver<WorldPacket>) {
        let (sender, receiver) = match capacity {
            Some(capacity) => crossbeam_channel::bounded(capacity),
            None => crossbeam_channel::unbounded(),
        };
        (Self::new(sender), receiver)
    }
}

impl PacketSink for ChannelSink {
    fn send_packet(&mut self, packet: WorldPacket) -> Result<(), DeliveryError> {
        let opcode = packet.opcode();
        self.sender
            .send(packet)
            .map_err(|_| DeliveryError::ChannelClosed { opcode })
    }
}

/// What one send pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Packets handed to the sink.
    pub packets_sent: u64,
    /// Payload bytes handed to the sink.
    pub bytes_sent: u64,
    /// Segment packets sent uncompressed.
    pub raw_packets: u64,
    /// Segment packets sent deflated.
    pub compressed_packets: u64,
    /// After-create packets sent.
    pub deferred_packets: u64,
    /// Segment packets that failed to build and were skipped.
    pub dropped_packets: u64,
}

impl DispatchStats {
    fn record(&mut self, packet: &WorldPacket) {
        self.packets_sent += 1;
        self.bytes_sent += packet.len() as u64;
    }
}

/// Sends a batch's packets to a sink.
#[derive(Clone, Copy, Debug)]
pub struct DeliveryDispatcher<'a> {
    assembler: PacketAssembler<'a>,
    after_create: &'a [WorldPacket],
}

impl<'a> DeliveryDispatcher<'a> {
    /// Creates a dispatcher for the assembler's batch and its deferred packets.
    #[must_use]
    pub const fn new(assembler: PacketAssembler<'a>, after_create: &'a [WorldPacket]) -> Self {
        Self {
            assembler,
            after_create,
        }
    }

    /// Sends everything, segment packets first, deferred packets last.
    ///
    /// Does nothing when the batch has no blocks and no out-of-range GUIDs.
    /// A segment whose packet cannot be built is logged and skipped rather
    /// than sent empty, which would desynchronize the client.
    ///
    /// # Errors
    ///
    /// Stops at the first sink failure and returns it.
    pub fn dispatch<S>(&self, sink: &mut S) -> Result<DispatchStats, DeliveryError>
    where
        S: PacketSink + ?Sized,
    {
        let mut stats = DispatchStats::default();

        if !self.assembler.has_data() {
            return Ok(stats);
        }

        for index in 0..self.assembler.packet_count() {
            let packet = match self.assembler.try_build_packet(index) {
                Ok(packet) => packet,
                Err(err) => {
                    tracing::warn!(segment = index, "Skipping undeliverable update packet: {err}");
                    stats.dropped_packets += 1;
                    continue;
                }
            };

            if packet.opcode() == Opcode::SMSG_COMPRESSED_UPDATE_OBJECT {
                stats.compressed_packets += 1;
            } else {
                stats.raw_packets += 1;
            }
            stats.record(&packet);
            sink.send_packet(packet)?;
        }

        for packet in self.after_create {
            stats.record(packet);
            stats.deferred_packets += 1;
            sink.send_packet(packet.clone())?;
        }

        tracing::debug!(
            packets = stats.packets_sent,
            bytes = stats.bytes_sent,
            dropped = stats.dropped_packets,
            "Update batch dispatched"
        );

        Ok(stats)
    }
}
