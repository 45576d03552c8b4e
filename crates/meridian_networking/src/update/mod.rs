//! # Object Updates
//!
//! Batches serialized entity updates for one client into packets the client
//! accepts.
//!
//! ## Pipeline
//!
//! ```text
//! update blocks ──► SegmentBatch ──► PacketAssembler ──► DeliveryDispatcher ──► PacketSink
//!                                        ▲      │
//!                        OutOfRangeSet ──┘      └──► Compressor (payload > 100 bytes)
//! ```
//!
//! One [`UpdateData`] is filled and drained per client per broadcast. It is
//! owned by whoever builds the snapshot and is never shared.

mod assembler;
mod data;
mod dispatch;
mod out_of_range;
mod segment;

pub use assembler::PacketAssembler;
pub use data::UpdateData;
pub use dispatch::{ChannelSink, DeliveryDispatcher, DispatchStats, PacketSink};
pub use out_of_range::OutOfRangeSet;
pub use segment::{Segment, SegmentBatch};
