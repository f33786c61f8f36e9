//! Decoded sonar samples.

use bytes::Bytes;

/// One sonar sample.
///
/// Positions are geographic degrees, speed is km/h and track is degrees.
/// `soundings` is the raw echo-intensity profile, shallowest sample first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ping {
    /// Milliseconds since the start of the recording.
    pub timestamp: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f32,
    pub track: f32,
    /// Bottom depth in meters, `0.0` when the format does not record it.
    pub depth: f32,
    /// Water temperature in Celsius, `0.0` when unknown.
    pub temperature: f32,
    /// Sounder range floor in meters, `0.0` when unknown.
    pub low_limit: f32,
    pub soundings: Bytes,
}

impl Ping {
    /// Number of samples in the echo profile.
    pub fn sample_count(&self) -> usize {
        self.soundings.len()
    }

    /// Returns a copy of this ping carrying a different profile.
    pub fn with_soundings(&self, soundings: Bytes) -> Self {
        Self {
            soundings,
            ..self.clone()
        }
    }

    /// Sample at a fraction of the profile (0.0 = surface, 1.0 = range floor).
    ///
    /// Returns `None` outside `[0, 1)` or for an empty profile.
    pub fn sample_at_fraction(&self, fraction: f32) -> Option<u8> {
        if !(0.0..1.0).contains(&fraction) || self.soundings.is_empty() {
            return None;
        }
        let idx = (fraction * self.soundings.len() as f32) as usize;
        self.soundings.get(idx.min(self.soundings.len() - 1)).copied()
    }
}
