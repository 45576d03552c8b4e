//! # Update Compression
//!
//! One-shot zlib compression of a finished update payload into a
//! caller-sized destination.
//!
//! ## Stream Stages
//!
//! 1. **Init**: open a zlib stream at the configured level
//! 2. **Feed**: push the whole source with no flush, all of it must be taken
//! 3. **Finish**: flush to the end, the stream must report stream end
//! 4. **Teardown**: the stream is dropped on every exit path
//!
//! Any stage failing abandons compression for this payload. There is no
//! retry at a different level.

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::config::NetworkConfig;
use crate::error::CompressionError;

/// Worst-case deflated size of `source_len` bytes, zlib framing included.
///
/// Same bound as zlib's `compressBound`.
#[inline]
#[must_use]
pub const fn compress_bound(source_len: usize) -> usize {
    source_len + (source_len >> 12) + (source_len >> 14) + (source_len >> 25) + 13
}

/// zlib compressor for update payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compressor {
    level: u32,
}

impl Compressor {
    /// Highest level the deflate stream accepts.
    pub const MAX_LEVEL: u32 = 9;

    /// Creates a compressor for the given level (1 = fastest, 9 = smallest).
    ///
    /// The level is checked when a stream is opened, not here.
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self { level }
    }

    /// Creates a compressor from server configuration.
    #[must_use]
    pub const fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.compression_level)
    }

    /// Returns the configured level.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Compresses `source` into `destination`.
    ///
    /// Returns the number of bytes written. Size `destination` with
    /// [`compress_bound`]. An empty destination fails the feed step with
    /// [`CompressionError::Step`]; any other undersized one runs out of room
    /// while finishing and fails with [`CompressionError::Finish`].
    ///
    /// # Errors
    ///
    /// Returns the failing stage. The failure is also logged.
    pub fn compress(
        &self,
        source: &[u8],
        destination: &mut [u8],
    ) -> Result<usize, CompressionError> {
        let result = self.deflate(source, destination);

        if let Err(err) = &result {
            tracing::error!(
                compression_level = self.level,
                source_len = source.len(),
                capacity = destination.len(),
                "Can't compress update packet: {err}"
            );
        }

        result
    }

    fn deflate(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, CompressionError> {
        if self.level > Self::MAX_LEVEL {
            return Err(CompressionError::Init { level: self.level });
        }

        let mut stream = Compress::new(Compression::new(self.level), true);

        let status = stream
            .compress(source, destination, FlushCompress::None)
            .map_err(|e| CompressionError::Step {
                diagnostic: e.to_string(),
            })?;
        if status != Status::Ok {
            return Err(CompressionError::Step {
                diagnostic: format!("{status:?}"),
            });
        }

        let consumed = stream_total(stream.total_in());
        if consumed != source.len() {
            return Err(CompressionError::NotGreedy {
                consumed,
                total: source.len(),
            });
        }

        let written = stream_total(stream.total_out());
        let status = stream
            .compress(&[], &mut destination[written..], FlushCompress::Finish)
            .map_err(|e| CompressionError::Finish {
                diagnostic: e.to_string(),
            })?;
        if status != Status::StreamEnd {
            return Err(CompressionError::Finish {
                diagnostic: format!("{status:?}"),
            });
        }

        Ok(stream_total(stream.total_out()))
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::from_config(&NetworkConfig::default())
    }
}

/// Stream totals never exceed the slices handed in.
#[inline]
fn stream_total(total: u64) -> usize {
    usize::try_from(total).unwrap_or(usize::MAX)
}
