//! # Networking Error Types
//!
//! All errors that can occur while batching, compressing and delivering
//! object updates. None of them is fatal to the server: the worst outcome is
//! one packet that is not sent.

use meridian_shared::Opcode;
use thiserror::Error;

/// Failures of a single deflate pass.
///
/// The variants follow the stages of the stream: start, feed, consume
/// check, finish. Stream teardown runs in `Drop` and cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    /// The stream could not be set up with the requested level.
    #[error("deflate init failed: compression level {level} is outside 0..=9")]
    Init {
        /// The rejected level.
        level: u32,
    },

    /// The non-flushing deflate step failed or made no progress.
    #[error("deflate step failed: {diagnostic}")]
    Step {
        /// Diagnostic reported by the deflate stream.
        diagnostic: String,
    },

    /// Input was left over after the feed step.
    ///
    /// The stream buffers input internally, so an undersized destination
    /// normally surfaces as [`CompressionError::Finish`]. This is reported
    /// only when the stream stops accepting input before the source ends.
    #[error("deflate not greedy: consumed {consumed} of {total} input bytes")]
    NotGreedy {
        /// Bytes the stream accepted.
        consumed: usize,
        /// Bytes offered.
        total: usize,
    },

    /// The finishing step did not report stream end.
    #[error("deflate should report stream end, got {diagnostic}")]
    Finish {
        /// Status or diagnostic reported instead.
        diagnostic: String,
    },
}

/// Failures while turning a segment into a packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketBuildError {
    /// No segment with this index.
    #[error("segment {index} out of range: batch has {count} segments")]
    SegmentOutOfRange {
        /// Requested index.
        index: usize,
        /// Segments in the batch.
        count: usize,
    },

    /// The payload was over the threshold and could not be deflated.
    #[error("can't compress update packet: {0}")]
    Compression(#[from] CompressionError),
}

/// Failures while handing packets to a client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The receiving side of the client channel is gone.
    #[error("client channel closed while sending {opcode}")]
    ChannelClosed {
        /// Opcode of the packet that could not be queued.
        opcode: Opcode,
    },
}

/// Failures while loading network configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {reason}")]
    Read {
        /// Path that was opened.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("invalid config: {0}")]
    Parse(String),

    /// The compression level is outside what the server accepts.
    #[error("compression level {0} is outside 1..=9")]
    InvalidCompressionLevel(u32),
}

/// Any error raised by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Packet build failure.
    #[error(transparent)]
    Build(#[from] PacketBuildError),

    /// Delivery failure.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for networking operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
