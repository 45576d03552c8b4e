//! # MERIDIAN Shared
//!
//! Wire vocabulary used by both the world server and the client.
//!
//! ## CRITICAL RULE
//!
//! Everything in this crate is mirrored by the shipped client. Sizes,
//! opcodes and markers must match it byte for byte.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod guid;
pub mod opcode;

pub use constants::{
    COMPRESSION_THRESHOLD, MAX_NETCLIENT_PACKET_SIZE, PACKED_GUID_MAX_SIZE,
    UPDATE_HEADER_MARGIN,
};
pub use guid::{ObjectGuid, PackedGuid};
pub use opcode::{Opcode, UpdateType};
