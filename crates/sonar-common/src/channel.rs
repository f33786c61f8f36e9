//! Sonar channel selection.
//!
//! A Humminbird recording stores every transducer channel as its own
//! index/data file pair inside the log directory:
//!
//! | Channel     | Files                               |
//! |-------------|-------------------------------------|
//! | Traditional | `B000.idx` / `B000.SON`             |
//! | DownScan    | `B001.idx` / `B001.SON`             |
//! | SideScan    | `B002` (left) and `B003` (right)    |

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which sonar channel of a recording to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// 2D down-looking sounder.
    #[default]
    Traditional,
    /// High frequency down imaging.
    DownScan,
    /// Dual channel side imaging, merged into one mirrored profile.
    SideScan,
}

impl ChannelKind {
    /// File stems (without extension) holding this channel's data, in merge order.
    pub fn file_stems(&self) -> &'static [&'static str] {
        match self {
            ChannelKind::Traditional => &["B000"],
            ChannelKind::DownScan => &["B001"],
            ChannelKind::SideScan => &["B002", "B003"],
        }
    }

    /// Whether pings of this channel are produced by merging two raw channels.
    pub fn is_dual(&self) -> bool {
        self.file_stems().len() == 2
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Traditional => "traditional",
            ChannelKind::DownScan => "downscan",
            ChannelKind::SideScan => "sidescan",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "traditional" | "2d" | "b000" => Ok(ChannelKind::Traditional),
            "downscan" | "down" | "b001" => Ok(ChannelKind::DownScan),
            "sidescan" | "side" | "b002" => Ok(ChannelKind::SideScan),
            _ => Err(ParseError::UnknownChannel(s.to_string())),
        }
    }
}
