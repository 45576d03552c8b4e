//! # MERIDIAN Networking - Object Update Pipeline
//!
//! Batches serialized entity updates for a client into packets the client
//! can swallow, announces objects that left its view, deflates large
//! payloads and hands the result to the client's session.
//!
//! ## Architecture
//!
//! - **Protocol**: byte buffer, world packet, zlib compressor
//! - **Update**: segment packing, out-of-range set, packet assembly, delivery
//! - **Config**: compression level from the server's TOML file
//!
//! ## Guarantees
//!
//! - Every packet stays under [`MAX_NETCLIENT_PACKET_SIZE`] unless a single
//!   block alone is bigger
//! - The out-of-range block is sent exactly once per batch, in the first packet
//! - A packet that failed to compress is never sent
//!
//! ## Threading
//!
//! Everything here is synchronous and single-owner. A server with many
//! clients builds one [`UpdateData`] per client and fans out across them.
//!
//! ## Example
//!
//! ```rust
//! use meridian_networking::{ChannelSink, NetworkConfig, UpdateData};
//! use meridian_shared::ObjectGuid;
//!
//! let config = NetworkConfig::from_toml_str("[network]\ncompression_level = 6\n").unwrap();
//! let (mut sink, session) = ChannelSink::channel(None);
//!
//! let mut data = UpdateData::with_config(&config);
//! data.add_update_block(&[0u8; 300]);
//! data.add_out_of_range_guids([ObjectGuid::new(1), ObjectGuid::new(2)]);
//! data.send_data(&mut sink).unwrap();
//!
//! assert_eq!(session.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod protocol;
pub mod update;

// Re-exports for convenience
pub use config::NetworkConfig;
pub use error::{
    CompressionError, ConfigError, DeliveryError, NetworkError, NetworkResult, PacketBuildError,
};
pub use protocol::{compress_bound, ByteBuffer, Compressor, WorldPacket};
pub use update::{
    ChannelSink, DeliveryDispatcher, DispatchStats, OutOfRangeSet, PacketAssembler, PacketSink,
    Segment, SegmentBatch, UpdateData,
};

pub use meridian_shared::{
    COMPRESSION_THRESHOLD, MAX_NETCLIENT_PACKET_SIZE, PACKED_GUID_MAX_SIZE, UPDATE_HEADER_MARGIN,
};
