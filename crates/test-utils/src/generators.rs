//! Synthetic recording and ping generators.
//!
//! [`LogSetBuilder`] writes a complete Humminbird recording (header, index
//! and data files) byte for byte, so decoder tests can run without real
//! recordings. The ping generators produce predictable echo profiles for
//! renderer and viewport tests.

use bytes::Bytes;
use sonar_common::Ping;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Size of the fixed header of a `.SON` record.
pub const RECORD_HEADER_SIZE: usize = 58;

/// One ping record to be written into a `.SON` file.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRecord {
    pub time: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// Heading in 1/10 degree.
    pub heading: i16,
    /// Speed in raw units (km/h ÷ 3.6).
    pub speed: i16,
    pub soundings: Vec<u8>,
}

impl SyntheticRecord {
    /// Record `i` of a straight track with a profile `[seed, seed+1, ...]`.
    ///
    /// Every sounding value is `(seed + j) mod 256`, so the byte at position
    /// `j` identifies both the ping and the sample.
    pub fn ramp(i: usize, seed: u8, samples: usize) -> Self {
        Self {
            time: i as i32 * 100,
            latitude: 61.5 + i as f64 * 1e-5,
            longitude: 23.75,
            heading: 900,
            speed: 2,
            soundings: (0..samples).map(|j| seed.wrapping_add(j as u8)).collect(),
        }
    }
}

/// Writes a synthetic Humminbird recording into a directory.
///
/// ```ignore
/// let dir = test_utils::temp_test_dir();
/// let dat = LogSetBuilder::new("R00001.DAT", 16)
///     .channel("B000", (0..10).map(|i| SyntheticRecord::ramp(i, 0, 16)).collect())
///     .write(dir.path())?;
/// ```
#[derive(Debug, Clone)]
pub struct LogSetBuilder {
    name: String,
    timestamp: i32,
    origin: (f64, f64),
    samples: usize,
    channels: Vec<(String, Vec<SyntheticRecord>)>,
}

impl LogSetBuilder {
    /// `name` is embedded in the header (10 bytes max); `samples` is the
    /// profile length of every record.
    pub fn new(name: &str, samples: usize) -> Self {
        Self {
            name: name.to_string(),
            timestamp: 1_300_000_000,
            origin: (61.5, 23.75),
            samples,
            channels: Vec::new(),
        }
    }

    pub fn timestamp(mut self, timestamp: i32) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Origin position in degrees.
    pub fn origin(mut self, lat: f64, lon: f64) -> Self {
        self.origin = (lat, lon);
        self
    }

    /// Add the records of one channel file pair (`"B000"` ... `"B003"`).
    pub fn channel(mut self, stem: &str, records: Vec<SyntheticRecord>) -> Self {
        self.channels.push((stem.to_string(), records));
        self
    }

    /// Block size written into the header.
    pub fn block_size(&self) -> usize {
        RECORD_HEADER_SIZE + self.samples
    }

    /// Write the recording and return the path of its `.DAT` file.
    pub fn write(&self, dir: &Path) -> io::Result<PathBuf> {
        let dat_path = dir.join(&self.name);
        fs::write(&dat_path, self.header_bytes())?;

        let stem = self
            .name
            .get(..self.name.len().saturating_sub(4))
            .unwrap_or(&self.name);
        let channel_dir = dir.join(stem);
        fs::create_dir_all(&channel_dir)?;

        for (file_stem, records) in &self.channels {
            let mut data = Vec::with_capacity(records.len() * self.block_size());
            let mut index = Vec::with_capacity(records.len() * 8);
            for record in records {
                index.extend_from_slice(&record.time.to_be_bytes());
                index.extend_from_slice(&(data.len() as u32).to_be_bytes());
                data.extend_from_slice(&record_bytes(record, self.samples));
            }
            fs::write(channel_dir.join(format!("{}.idx", file_stem)), index)?;
            fs::write(channel_dir.join(format!("{}.SON", file_stem)), data)?;
        }

        Ok(dat_path)
    }

    fn header_bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; 20];
        data.extend_from_slice(&self.timestamp.to_be_bytes());
        data.extend_from_slice(&projection::from_longitude(self.origin.1).to_be_bytes());
        data.extend_from_slice(&projection::from_latitude(self.origin.0).to_be_bytes());
        let mut name = [0u8; 10];
        for (dst, src) in name.iter_mut().zip(self.name.bytes()) {
            *dst = src;
        }
        data.extend_from_slice(&name);
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&0i32.to_be_bytes());
        data.extend_from_slice(&0i32.to_be_bytes());
        data.extend_from_slice(&(self.block_size() as i32).to_be_bytes());
        data
    }
}

/// Encode one `.SON` record with exactly `samples` sounding bytes.
pub fn record_bytes(record: &SyntheticRecord, samples: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(RECORD_HEADER_SIZE + samples);
    data.extend_from_slice(&[0xC0, 0xDE, 0xAB, 0x21, 0x80, 0, 0, 0, 0, 0]);
    data.extend_from_slice(&record.time.to_be_bytes());
    data.push(0x84);
    data.extend_from_slice(&projection::from_longitude(record.longitude).to_be_bytes());
    data.push(0x85);
    data.extend_from_slice(&projection::from_latitude(record.latitude).to_be_bytes());
    data.extend_from_slice(&[0x02, 0x01, 0x00]);
    data.extend_from_slice(&record.heading.to_be_bytes());
    data.extend_from_slice(&[0x03, 0x00, 0x00]);
    data.extend_from_slice(&record.speed.to_be_bytes());
    data.extend_from_slice(&[0; 5]);
    data.extend_from_slice(&455_000i32.to_be_bytes());
    data.extend_from_slice(&[0; 10]);
    data.extend_from_slice(&(samples as i32).to_be_bytes());
    data.push(0xA0);
    let mut soundings = record.soundings.clone();
    soundings.resize(samples, 0);
    data.extend_from_slice(&soundings);
    data
}

/// Pings with a flat bottom echo at `depth` meters over a `low_limit` range.
///
/// Samples above the bottom are weak (16), the bottom sample and everything
/// below it are strong (224).
pub fn create_bottom_pings(count: usize, samples: usize, depth: f32, low_limit: f32) -> Vec<Ping> {
    (0..count)
        .map(|i| {
            let bottom = ((depth / low_limit) * samples as f32) as usize;
            let soundings: Vec<u8> = (0..samples)
                .map(|j| if j >= bottom { 224 } else { 16 })
                .collect();
            Ping {
                timestamp: i as i32 * 100,
                depth,
                low_limit,
                temperature: 12.5,
                soundings: Bytes::from(soundings),
                ..Default::default()
            }
        })
        .collect()
}

/// Pings whose depth follows `depth_fn(i)` with a fixed `low_limit`.
pub fn create_depth_profile<F>(count: usize, samples: usize, low_limit: f32, depth_fn: F) -> Vec<Ping>
where
    F: Fn(usize) -> f32,
{
    (0..count)
        .map(|i| {
            let depth = depth_fn(i);
            let mut ping = create_bottom_pings(1, samples, depth, low_limit).remove(0);
            ping.timestamp = i as i32 * 100;
            ping
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_bytes_size() {
        let record = SyntheticRecord::ramp(0, 0, 32);
        assert_eq!(record_bytes(&record, 32).len(), RECORD_HEADER_SIZE + 32);
        // Profiles are padded or cut to the block size
        assert_eq!(record_bytes(&record, 8).len(), RECORD_HEADER_SIZE + 8);
        assert_eq!(record_bytes(&record, 40).len(), RECORD_HEADER_SIZE + 40);
    }

    #[test]
    fn test_write_layout() {
        let dir = crate::temp_test_dir();
        let records: Vec<_> = (0..3).map(|i| SyntheticRecord::ramp(i, 0, 4)).collect();
        let dat = LogSetBuilder::new("R00001.DAT", 4)
            .channel("B000", records)
            .write(dir.path())
            .unwrap();

        assert_eq!(fs::read(&dat).unwrap().len(), 56);
        let idx = fs::read(dir.path().join("R00001/B000.idx")).unwrap();
        assert_eq!(idx.len(), 3 * 8);
        let son = fs::read(dir.path().join("R00001/B000.SON")).unwrap();
        assert_eq!(son.len(), 3 * (RECORD_HEADER_SIZE + 4));
    }

    #[test]
    fn test_bottom_pings() {
        let pings = create_bottom_pings(2, 100, 5.0, 20.0);
        assert_eq!(pings.len(), 2);
        assert_eq!(pings[0].soundings[24], 16);
        assert_eq!(pings[0].soundings[25], 224);
    }

    #[test]
    fn test_depth_profile() {
        let pings = create_depth_profile(4, 10, 10.0, |i| i as f32 + 1.0);
        let depths: Vec<f32> = pings.iter().map(|p| p.depth).collect();
        assert_eq!(depths, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
