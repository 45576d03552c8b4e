//! # Segment Batch
//!
//! Splits a stream of update blocks into segments that each fit one client
//! packet.
//!
//! ## Placement
//!
//! A block joins the current segment when
//!
//! ```text
//! 128 + 9 * out_of_range + segment_len + block_len < MAX_NETCLIENT_PACKET_SIZE
//! ```
//!
//! and opens a new segment otherwise. The estimate charges the worst case
//! for the count header, the out-of-range block and every packed GUID, so a
//! segment framed with the out-of-range set as it was at append time stays
//! under the ceiling.

use meridian_shared::{MAX_NETCLIENT_PACKET_SIZE, PACKED_GUID_MAX_SIZE, UPDATE_HEADER_MARGIN};

use crate::protocol::ByteBuffer;

/// Blocks destined for one packet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    buffer: ByteBuffer,
    block_count: u32,
}

impl Segment {
    /// Concatenated block bytes.
    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    /// Number of blocks appended.
    #[inline]
    #[must_use]
    pub const fn block_count(&self) -> u32 {
        self.block_count
    }

    /// Size of the block bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no block was appended.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.block_count == 0
    }

    fn push(&mut self, block: &[u8]) {
        self.buffer.append(block);
        self.block_count += 1;
    }
}

/// Ordered segments with one open tail.
///
/// Only the segment at [`SegmentBatch::current_index`] accepts blocks;
/// earlier segments are never touched again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentBatch {
    segments: Vec<Segment>,
    current: usize,
}

impl SegmentBatch {
    /// Creates a batch holding one empty segment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::default()],
            current: 0,
        }
    }

    /// Pessimistic packet size of a segment of `segment_len` bytes once framed
    /// with `out_of_range_count` GUIDs.
    #[inline]
    #[must_use]
    pub const fn estimate(segment_len: usize, out_of_range_count: usize) -> usize {
        UPDATE_HEADER_MARGIN + PACKED_GUID_MAX_SIZE * out_of_range_count + segment_len
    }

    /// Appends one block, opening a new segment if it would not fit.
    ///
    /// Returns the index of the segment that received the block.
    ///
    /// A block too large for any packet is still accepted and ends up alone
    /// in its segment; blocks are never split. The resulting packet exceeds
    /// the client ceiling, which the shipped client tolerates less well than
    /// a changed packet boundary, so this is kept as is.
    ///
    /// An empty tail only takes a failing block when no out-of-range GUIDs
    /// are pending. Segment 0 carries the out-of-range block, so otherwise
    /// the block moves on and segment 0 is sent with that block alone.
    pub fn append_block(&mut self, block: &[u8], out_of_range_count: usize) -> usize {
        let tail = &self.segments[self.current];
        let existing = Self::estimate(tail.len(), out_of_range_count);
        let tail_reusable = tail.is_empty() && out_of_range_count == 0;

        if existing + block.len() >= MAX_NETCLIENT_PACKET_SIZE && !tail_reusable {
            self.segments.push(Segment::default());
            self.current += 1;
            tracing::trace!(
                segment = self.current,
                block_len = block.len(),
                "Update segment full, opened a new one"
            );
        }

        self.segments[self.current].push(block);
        self.current
    }

    /// Number of segments, one packet each.
    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Index of the open segment.
    #[inline]
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Returns the segment at `index`.
    #[inline]
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// All segments in packet order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Blocks across all segments.
    #[must_use]
    pub fn total_blocks(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.block_count)).sum()
    }

    /// Returns true if any block was appended.
    #[inline]
    #[must_use]
    pub fn has_blocks(&self) -> bool {
        self.segments.iter().any(|s| !s.is_empty())
    }

    /// Drops every segment and reopens a single empty one.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.segments.push(Segment::default());
        self.current = 0;
    }
}

impl Default for SegmentBatch {
    fn default() -> Self {
        Self::new()
    }
}
