//! `.DAT` log header parsing.
//!
//! Layout (big-endian):
//!
//! | Bytes | Field                                   |
//! |-------|-----------------------------------------|
//! | 0-19  | lead-in, not decoded                    |
//! | 20-23 | capture time, Unix seconds (`i32`)      |
//! | 24-27 | origin longitude, Mercator meters       |
//! | 28-31 | origin latitude, Mercator meters        |
//! | 32-41 | recording name, e.g. `R00012.DAT`       |
//! | 42-43 | terminator                              |
//! | 44-51 | two unidentified `i32` fields           |
//! | 52-55 | ping record block size                  |

use crate::error::{DecodeError, DecodeResult};
use crate::fields::FieldReader;
use crate::record::RECORD_HEADER_SIZE;
use chrono::{DateTime, TimeZone, Utc};

/// Bytes skipped before the first decoded header field.
pub const HEADER_LEAD_IN: usize = 20;

/// Size of the name field embedded in the header.
pub const NAME_FIELD_SIZE: usize = 10;

/// Total number of header bytes consumed by [`parse_header`].
pub const HEADER_SIZE: usize = HEADER_LEAD_IN + 12 + NAME_FIELD_SIZE + 2 + 12;

/// Length of the extension stripped from the embedded name to get the data directory.
const EXTENSION_LEN: usize = 4;

/// Metadata stored in a recording's `.DAT` file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogHeader {
    pub timestamp: i32,
    /// Raw Mercator easting of the recording origin.
    pub longitude: i32,
    /// Raw Mercator northing of the recording origin.
    pub latitude: i32,
    /// Name embedded in the header, NULs and padding removed.
    pub name: String,
    /// Unidentified fields, kept for completeness.
    pub unknown: [i32; 2],
    /// Size of one ping record in the `.SON` files.
    pub block_size: u32,
}

impl LogHeader {
    /// Origin longitude in degrees.
    pub fn origin_longitude(&self) -> f64 {
        projection::to_longitude(self.longitude)
    }

    /// Origin latitude in degrees.
    pub fn origin_latitude(&self) -> f64 {
        projection::to_latitude(self.latitude)
    }

    /// Capture time, if the timestamp is representable.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp as i64, 0).single()
    }

    /// Number of sounding bytes carried by every ping record.
    pub fn soundings_len(&self) -> usize {
        self.block_size as usize - RECORD_HEADER_SIZE
    }

    /// Name of the directory holding the channel files (the name without its extension).
    pub fn directory_name(&self) -> DecodeResult<&str> {
        if self.name.len() <= EXTENSION_LEN {
            return Err(DecodeError::format_mismatch(format!(
                "header name '{}' is too short to carry an extension",
                self.name
            )));
        }
        self.name
            .get(..self.name.len() - EXTENSION_LEN)
            .ok_or_else(|| {
                DecodeError::format_mismatch(format!("header name '{}' is not ASCII", self.name))
            })
    }
}

/// Parse the header at the start of a `.DAT` file.
pub fn parse_header(data: &[u8]) -> DecodeResult<LogHeader> {
    let mut r = FieldReader::new(data, |needed, available| DecodeError::Truncated {
        section: "log header",
        needed,
        available,
    });

    r.skip(HEADER_LEAD_IN)?;
    let timestamp = r.i32()?;
    let longitude = r.i32()?;
    let latitude = r.i32()?;

    let name_bytes = r.bytes(NAME_FIELD_SIZE)?;
    if !name_bytes.is_ascii() {
        return Err(DecodeError::format_mismatch(format!(
            "header name {:02X?} is not ASCII",
            name_bytes
        )));
    }
    let name = String::from_utf8_lossy(name_bytes)
        .trim_end_matches('\0')
        .trim()
        .to_string();
    r.skip(2)?; // NUL terminator

    let unknown = [r.i32()?, r.i32()?];
    let block_size = r.i32()?;

    if block_size < RECORD_HEADER_SIZE as i32 {
        return Err(DecodeError::format_mismatch(format!(
            "block size {} is smaller than the {} byte record header",
            block_size, RECORD_HEADER_SIZE
        )));
    }

    Ok(LogHeader {
        timestamp,
        longitude,
        latitude,
        name,
        unknown,
        block_size: block_size as u32,
    })
}
