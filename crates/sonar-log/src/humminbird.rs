//! Humminbird recording reader.
//!
//! A recording is a `.DAT` header next to a directory named after it, which
//! holds one `.idx`/`.SON` pair per channel:
//!
//! ```text
//! R00012.DAT
//! R00012/
//!     B000.idx  B000.SON    traditional
//!     B001.idx  B001.SON    down imaging
//!     B002.idx  B002.SON    side imaging, left
//!     B003.idx  B003.SON    side imaging, right
//! ```
//!
//! Format notes: <http://www.xumba.scholleco.com/viewtopic.php?t=118>

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use sonar_common::{ChannelKind, Ping};
use tracing::{debug, warn};

use crate::error::{DecodeError, DecodeResult};
use crate::header::{parse_header, LogHeader};
use crate::index::{parse_index, LogIndex};
use crate::record::parse_record;
use crate::sidescan::merge_channels;
use crate::SonarSource;

/// One channel's index and data file.
#[derive(Debug, Clone)]
struct ChannelFiles {
    data_path: PathBuf,
    index: LogIndex,
}

/// An opened Humminbird recording, bound to one channel.
#[derive(Debug, Clone)]
pub struct HumminbirdLog {
    header: LogHeader,
    channel: ChannelKind,
    directory: PathBuf,
    files: Vec<ChannelFiles>,
    len: usize,
}

impl HumminbirdLog {
    /// Open the `.DAT` file at `path` and load the index of `channel`.
    pub fn open(path: impl AsRef<Path>, channel: ChannelKind) -> DecodeResult<Self> {
        let path = path.as_ref();
        let header = read_header(path)?;

        let directory = match path.parent() {
            Some(parent) => parent.join(header.directory_name()?),
            None => PathBuf::from(header.directory_name()?),
        };

        let mut files = Vec::with_capacity(channel.file_stems().len());
        for stem in channel.file_stems() {
            let index_path = directory.join(format!("{}.idx", stem));
            let data_path = directory.join(format!("{}.SON", stem));

            let index = parse_index(&read_file(&index_path)?)?;
            if !data_path.exists() {
                return Err(DecodeError::FileNotFound(data_path));
            }
            files.push(ChannelFiles { data_path, index });
        }

        let len = files.iter().map(|f| f.index.len()).min().unwrap_or(0);
        if channel.is_dual() && files.iter().any(|f| f.index.len() != len) {
            warn!(
                channel = %channel,
                lengths = ?files.iter().map(|f| f.index.len()).collect::<Vec<_>>(),
                "Side imaging channels differ in length, truncating to the shorter one"
            );
        }

        debug!(
            path = %path.display(),
            channel = %channel,
            pings = len,
            block_size = header.block_size,
            "Opened sonar log"
        );

        Ok(Self {
            header,
            channel,
            directory,
            files,
            len,
        })
    }

    pub fn header(&self) -> &LogHeader {
        &self.header
    }

    /// Directory holding the channel files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn channel(&self) -> ChannelKind {
        self.channel
    }

    /// Decode `count` pings starting at logical index `offset`.
    ///
    /// Side imaging logs return one merged ping per index.
    pub fn ping_range(&self, offset: usize, count: usize) -> DecodeResult<Vec<Ping>> {
        let end = offset.checked_add(count);
        if end.map_or(true, |end| end > self.len) {
            return Err(DecodeError::OutOfRange {
                offset,
                count,
                len: self.len,
            });
        }

        let mut channels = Vec::with_capacity(self.files.len());
        for files in &self.files {
            channels.push(self.read_channel(files, offset, count)?);
        }

        let mut channels = channels.into_iter();
        let first = channels.next().unwrap_or_default();
        Ok(match channels.next() {
            Some(second) => merge_channels(first, second),
            None => first,
        })
    }

    fn read_channel(
        &self,
        files: &ChannelFiles,
        offset: usize,
        count: usize,
    ) -> DecodeResult<Vec<Ping>> {
        let block_size = self.header.block_size as usize;
        let mut file =
            File::open(&files.data_path).map_err(|e| DecodeError::from_io(e, &files.data_path))?;
        let mut block = Vec::with_capacity(block_size);
        let mut pings = Vec::with_capacity(count);

        for i in offset..offset + count {
            let position = files.index.offset(i).ok_or(DecodeError::OutOfRange {
                offset,
                count,
                len: files.index.len(),
            })? as u64;

            file.seek(SeekFrom::Start(position))?;
            block.clear();
            (&mut file).take(block_size as u64).read_to_end(&mut block)?;

            pings.push(parse_record(&block, block_size, position)?.into_ping());
        }

        Ok(pings)
    }
}

impl SonarSource for HumminbirdLog {
    fn len(&self) -> usize {
        self.len
    }

    fn channel(&self) -> ChannelKind {
        self.channel
    }

    fn ping_range(&self, offset: usize, count: usize) -> DecodeResult<Vec<Ping>> {
        HumminbirdLog::ping_range(self, offset, count)
    }
}

/// Read only the header of a `.DAT` file.
pub fn read_header(path: impl AsRef<Path>) -> DecodeResult<LogHeader> {
    parse_header(&read_file(path.as_ref())?)
}

fn read_file(path: &Path) -> DecodeResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| DecodeError::from_io(e, path))
}
