//! Sonar log decoder.
//!
//! Reads Humminbird recordings (`.DAT` header plus per-channel `.idx` index and
//! `.SON` data files) and exposes random access to decoded [`Ping`]s by
//! logical index range.
//!
//! # Example
//!
//! ```ignore
//! use sonar_common::ChannelKind;
//! use sonar_log::HumminbirdLog;
//!
//! let log = HumminbirdLog::open("R00012.DAT", ChannelKind::SideScan)?;
//! let pings = log.ping_range(0, 400)?;
//! ```

pub mod error;
mod fields;
pub mod header;
pub mod humminbird;
pub mod index;
pub mod record;
pub mod sidescan;

pub use error::{DecodeError, DecodeResult};
pub use header::{parse_header, LogHeader};
pub use humminbird::{read_header, HumminbirdLog};
pub use index::{parse_index, LogIndex};
pub use record::{parse_record, PingRecord, RECORD_HEADER_SIZE};
pub use sidescan::{merge_channels, merge_soundings};

use sonar_common::{ChannelKind, Ping};

/// Random access to the pings of one decoded channel.
pub trait SonarSource: Send + Sync {
    /// Number of logical pings.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn channel(&self) -> ChannelKind;

    /// Decode `count` pings starting at `offset`.
    fn ping_range(&self, offset: usize, count: usize) -> DecodeResult<Vec<Ping>>;
}
