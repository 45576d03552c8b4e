//! # Out-of-Range Set
//!
//! GUIDs of objects that left the client's view since the last broadcast.

use std::collections::hash_set;
use std::collections::HashSet;

use meridian_shared::{ObjectGuid, UpdateType, PACKED_GUID_MAX_SIZE};

use crate::protocol::ByteBuffer;

/// Deduplicating set of GUIDs to announce as out of range.
///
/// Iteration order is unspecified; every GUID is encoded on its own, so the
/// client does not care.
#[derive(Clone, Debug, Default)]
pub struct OutOfRangeSet {
    guids: HashSet<ObjectGuid>,
}

impl OutOfRangeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one GUID. Returns false if it was already present.
    pub fn add(&mut self, guid: ObjectGuid) -> bool {
        self.guids.insert(guid)
    }

    /// Adds every GUID from `guids`, absorbing duplicates.
    pub fn add_all<I>(&mut self, guids: I)
    where
        I: IntoIterator<Item = ObjectGuid>,
    {
        self.guids.extend(guids);
    }

    /// Returns true if `guid` is in the set.
    #[inline]
    #[must_use]
    pub fn contains(&self, guid: ObjectGuid) -> bool {
        self.guids.contains(&guid)
    }

    /// Number of distinct GUIDs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.guids.len()
    }

    /// Returns true if nothing left view.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }

    /// Empties the set.
    pub fn clear(&mut self) {
        self.guids.clear();
    }

    /// Iterates the GUIDs in unspecified order.
    pub fn iter(&self) -> hash_set::Iter<'_, ObjectGuid> {
        self.guids.iter()
    }

    /// Upper bound on the encoded block, marker and count included.
    #[must_use]
    pub fn worst_case_block_size(&self) -> usize {
        1 + 4 + PACKED_GUID_MAX_SIZE * self.guids.len()
    }

    /// Writes the out-of-range block.
    ///
    /// ```text
    /// [u8 OUT_OF_RANGE_OBJECTS][u32 count][count × packed GUID]
    /// ```
    pub fn write_block(&self, buf: &mut ByteBuffer) {
        buf.write_u8(UpdateType::OutOfRangeObjects.as_u8());
        buf.write_u32(u32::try_from(self.guids.len()).unwrap_or(u32::MAX));

        for guid in &self.guids {
            buf.append(guid.write_as_packed().as_bytes());
        }
    }
}

impl<'a> IntoIterator for &'a OutOfRangeSet {
    type Item = &'a ObjectGuid;
    type IntoIter = hash_set::Iter<'a, ObjectGuid>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<ObjectGuid> for OutOfRangeSet {
    fn extend<I: IntoIterator<Item = ObjectGuid>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_duplicates_absorbed() {
        let mut set = OutOfRangeSet::new();
        assert!(set.add(ObjectGuid::new(7)));
        assert!(!set.add(ObjectGuid::new(7)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_bulk_duplicates_absorbed() {
        let mut set = OutOfRangeSet::new();
        set.add(ObjectGuid::new(7));
        set.add_all([ObjectGuid::new(7), ObjectGuid::new(7), ObjectGuid::new(8)]);

        assert_eq!(set.len(), 2);
        assert!(set.contains(ObjectGuid::new(8)));
    }

    #[test]
    fn test_clear() {
        let mut set = OutOfRangeSet::new();
        set.add_all((1..=3).map(ObjectGuid::new));
        assert_eq!(set.len(), 3);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_block_layout() {
        let mut set = OutOfRangeSet::new();
        set.add(ObjectGuid::new(0x2A));
        set.add(ObjectGuid::new(0x0102_0304_0506_0708));

        let mut buf = ByteBuffer::new();
        set.write_block(&mut buf);
        let bytes = buf.contents();

        assert_eq!(bytes[0], UpdateType::OutOfRangeObjects.as_u8());
        assert_eq!(u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]), 2);
        assert_eq!(bytes.len(), 5 + 2 + 9);
        assert!(bytes.len() <= set.worst_case_block_size());

        let mut decoded = Vec::new();
        let mut rest = &bytes[5..];
        while !rest.is_empty() {
            let (guid, used) = ObjectGuid::read_packed(rest).unwrap();
            decoded.push(guid);
            rest = &rest[used..];
        }
        decoded.sort();
        assert_eq!(
            decoded,
            vec![ObjectGuid::new(0x2A), ObjectGuid::new(0x0102_0304_0506_0708)]
        );
    }
}
