//! # Wire Protocol
//!
//! Byte-level building blocks for world packets.
//!
//! ## Packet Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Opcode (carried beside the payload, framed by the session)   │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Payload (variable, max MAX_NETCLIENT_PACKET_SIZE bytes)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian.

mod buffer;
mod compression;
mod packet;

pub use buffer::ByteBuffer;
pub use compression::{compress_bound, Compressor};
pub use packet::WorldPacket;
