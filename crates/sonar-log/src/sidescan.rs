//! Merging of the two side imaging channels.
//!
//! The left transducer's profile runs outward from the boat, so it is
//! reversed before being placed in front of the right profile. The merged
//! profile reads far-left → nadir → far-right.

use bytes::{BufMut, Bytes, BytesMut};
use sonar_common::Ping;

/// Merge one left and one right profile: `reverse(left) ++ right`.
pub fn merge_soundings(left: &[u8], right: &[u8]) -> Bytes {
    let mut merged = BytesMut::with_capacity(left.len() + right.len());
    merged.extend(left.iter().rev());
    merged.put_slice(right);
    merged.freeze()
}

/// Merge channel-aligned ping lists.
///
/// The left ping's metadata is kept as the canonical ping. Lists of
/// different lengths are merged up to the shorter one.
pub fn merge_channels(left: Vec<Ping>, right: Vec<Ping>) -> Vec<Ping> {
    left.into_iter()
        .zip(right)
        .map(|(l, r)| l.with_soundings(merge_soundings(&l.soundings, &r.soundings)))
        .collect()
}
