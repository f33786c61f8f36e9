//! Per-pixel depth, low-limit and temperature readings.

/// Readings for every logical pixel column of the log.
///
/// The three streams are independent. Unpopulated pixels read as `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthTable {
    depths: Vec<f32>,
    low_limits: Vec<f32>,
    temps: Vec<f32>,
}

impl DepthTable {
    /// Table sized for a log `width` pixels wide.
    pub fn new(width: u32) -> Self {
        let width = width as usize;
        Self {
            depths: vec![0.0; width],
            low_limits: vec![0.0; width],
            temps: vec![0.0; width],
        }
    }

    /// Number of pixel columns the table covers.
    pub fn width(&self) -> usize {
        self.depths.len().max(self.low_limits.len()).max(self.temps.len())
    }

    pub fn append_depth(&mut self, values: &[f32], start: u32) {
        write_at(&mut self.depths, values, start);
    }

    pub fn append_low_limit(&mut self, values: &[f32], start: u32) {
        write_at(&mut self.low_limits, values, start);
    }

    pub fn append_temp(&mut self, values: &[f32], start: u32) {
        write_at(&mut self.temps, values, start);
    }

    pub fn depth_at(&self, x: u32) -> f32 {
        read_at(&self.depths, x)
    }

    pub fn low_limit_at(&self, x: u32) -> f32 {
        read_at(&self.low_limits, x)
    }

    pub fn temp_at(&self, x: u32) -> f32 {
        read_at(&self.temps, x)
    }
}

/// Overwrite `values` at `start..`; grows the stream, never shrinks it.
fn write_at(stream: &mut Vec<f32>, values: &[f32], start: u32) {
    let start = start as usize;
    let end = start + values.len();
    if stream.len() < end {
        stream.resize(end, 0.0);
    }
    stream[start..end].copy_from_slice(values);
}

fn read_at(stream: &[f32], x: u32) -> f32 {
    stream.get(x as usize).copied().unwrap_or(0.0)
}
