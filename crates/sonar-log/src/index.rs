//! `.idx` index files.
//!
//! An index is a flat sequence of 8-byte big-endian records
//! `[time: i32][offset: i32]`, one per ping. Only the offset is used.

use crate::error::{DecodeError, DecodeResult};
use crate::fields::FieldReader;

/// Size of one index record.
pub const INDEX_RECORD_SIZE: usize = 8;

/// Byte offsets of every ping in one `.SON` data file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogIndex {
    offsets: Vec<u32>,
}

impl LogIndex {
    pub fn new(offsets: Vec<u32>) -> Self {
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// File offset of ping `i`.
    pub fn offset(&self, i: usize) -> Option<u32> {
        self.offsets.get(i).copied()
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }
}

/// Parse a complete `.idx` file.
///
/// A trailing partial record means the file was cut short and is reported as
/// [`DecodeError::Truncated`].
pub fn parse_index(data: &[u8]) -> DecodeResult<LogIndex> {
    let mut r = FieldReader::new(data, |needed, available| DecodeError::Truncated {
        section: "index record",
        needed,
        available,
    });

    let mut offsets = Vec::with_capacity(data.len() / INDEX_RECORD_SIZE);
    while r.remaining() > 0 {
        if r.remaining() < INDEX_RECORD_SIZE {
            return Err(DecodeError::Truncated {
                section: "index record",
                needed: INDEX_RECORD_SIZE,
                available: r.remaining(),
            });
        }
        let _time = r.i32()?;
        offsets.push(r.u32()?);
    }

    Ok(LogIndex { offsets })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_bytes(entries: &[(i32, u32)]) -> Vec<u8> {
        entries
            .iter()
            .flat_map(|(t, o)| t.to_be_bytes().into_iter().chain(o.to_be_bytes()))
            .collect()
    }

    #[test]
    fn test_parse_index_offsets_only() {
        let data = index_bytes(&[(100, 0), (200, 1658), (300, 3316)]);
        let index = parse_index(&data).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.offsets(), &[0, 1658, 3316]);
        assert_eq!(index.offset(1), Some(1658));
        assert_eq!(index.offset(3), None);
    }

    #[test]
    fn test_empty_index() {
        let index = parse_index(&[]).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_trailing_partial_record() {
        let mut data = index_bytes(&[(1, 0), (2, 100)]);
        data.extend_from_slice(&[0, 0, 0, 3, 0]);
        match parse_index(&data) {
            Err(DecodeError::Truncated { needed, available, .. }) => {
                assert_eq!(needed, INDEX_RECORD_SIZE);
                assert_eq!(available, 5);
            }
            other => panic!("expected Truncated, got {:?}", other),
        }
    }
}
