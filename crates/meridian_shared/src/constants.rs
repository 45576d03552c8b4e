//! # Wire Constants
//!
//! **CRITICAL:** These values are baked into the client binary.
//! Changes require a client rebuild.

// =============================================================================
// PACKET SIZING
// =============================================================================

/// Largest packet the client accepts.
///
/// The client stores packet sizes in an `int16` and needs one trailing byte
/// on free, anything bigger crashes it.
pub const MAX_NETCLIENT_PACKET_SIZE: usize = 32767 - 1;

/// Payloads strictly larger than this are deflated before sending.
pub const COMPRESSION_THRESHOLD: usize = 100;

/// Headroom reserved for framing when deciding where an update block goes.
pub const UPDATE_HEADER_MARGIN: usize = 128;

/// Worst-case size of a packed [`ObjectGuid`](crate::ObjectGuid): one mask
/// byte plus all eight value bytes.
pub const PACKED_GUID_MAX_SIZE: usize = 9;
