//! `.SON` ping record parsing.
//!
//! Each record is `block_size` bytes: a fixed 58-byte header followed by the
//! echo profile. Header layout (big-endian, relative to the record start):
//!
//! | Bytes | Field                            |
//! |-------|----------------------------------|
//! | 10-13 | time since start, ms (`i32`)     |
//! | 15-18 | longitude, Mercator meters       |
//! | 20-23 | latitude, Mercator meters        |
//! | 27-28 | heading, 1/10 degree (`i16`)     |
//! | 32-33 | speed, raw units (`i16`)         |
//! | 39-42 | frequency (`i32`, unused)        |
//! | 53-56 | unused `i32`                     |

use crate::error::{DecodeError, DecodeResult};
use crate::fields::FieldReader;
use bytes::Bytes;
use sonar_common::Ping;

/// Size of the fixed part of a ping record.
pub const RECORD_HEADER_SIZE: usize = 58;

/// Raw speed units to km/h.
const SPEED_TO_KMH: f32 = 3.6;

/// Raw heading units to degrees.
const HEADING_TO_DEG: f32 = 10.0;

/// Undecoded field values of one ping record.
#[derive(Debug, Clone, PartialEq)]
pub struct PingRecord {
    pub time: i32,
    pub longitude: i32,
    pub latitude: i32,
    pub heading: i16,
    pub speed: i16,
    pub frequency: i32,
    pub sonar_field: i32,
    pub soundings: Bytes,
}

impl PingRecord {
    /// Convert raw units into a [`Ping`].
    ///
    /// Depth, temperature and low-limit are not stored by this format and
    /// are reported as `0.0`.
    pub fn into_ping(self) -> Ping {
        Ping {
            timestamp: self.time,
            latitude: projection::to_latitude(self.latitude),
            longitude: projection::to_longitude(self.longitude),
            speed: self.speed as f32 * SPEED_TO_KMH,
            track: self.heading as f32 / HEADING_TO_DEG,
            depth: 0.0,
            temperature: 0.0,
            low_limit: 0.0,
            soundings: self.soundings,
        }
    }
}

/// Parse one record read from byte `file_offset` of a data file.
///
/// `data` must hold the whole block; a shorter buffer means the record runs
/// past the end of the file.
pub fn parse_record(data: &[u8], block_size: usize, file_offset: u64) -> DecodeResult<PingRecord> {
    if data.len() < block_size {
        return Err(DecodeError::ShortRecord {
            offset: file_offset,
            needed: block_size,
            available: data.len(),
        });
    }

    let mut r = FieldReader::new(data, |needed, available| DecodeError::ShortRecord {
        offset: file_offset,
        needed,
        available,
    });

    r.skip(10)?;
    let time = r.i32()?;
    r.skip(1)?;
    let longitude = r.i32()?;
    r.skip(1)?;
    let latitude = r.i32()?;
    r.skip(3)?;
    let heading = r.i16()?;
    r.skip(3)?;
    let speed = r.i16()?;
    r.skip(5)?;
    let frequency = r.i32()?;
    r.skip(10)?;
    let sonar_field = r.i32()?;
    r.skip(1)?;

    let soundings = Bytes::copy_from_slice(r.bytes(block_size - RECORD_HEADER_SIZE)?);

    Ok(PingRecord {
        time,
        longitude,
        latitude,
        heading,
        speed,
        frequency,
        sonar_field,
        soundings,
    })
}
