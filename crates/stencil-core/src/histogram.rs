//! 256-bin luma histograms for contrast-limited equalization.
//!
//! A `TileHistogram` is collected per equalization tile, clipped at the
//! contrast limit with the excess spread back over all bins, and finally
//! turned into a lookup table from its cumulative distribution.

/// Number of bins for 8-bit data.
pub const BINS: usize = 256;

/// Histogram of a single-channel 8-bit region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileHistogram {
    bins: [u32; BINS],
}

impl Default for TileHistogram {
    fn default() -> Self {
        Self { bins: [0; BINS] }
    }
}

impl TileHistogram {
    /// Create a new empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from a sequence of luma values.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let mut hist = Self::new();
        for v in values {
            hist.add(v);
        }
        hist
    }

    #[inline]
    pub fn add(&mut self, value: u8) {
        self.bins[value as usize] += 1;
    }

    pub fn bins(&self) -> &[u32; BINS] {
        &self.bins
    }

    /// Total number of samples.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Clip every bin at `limit` and redistribute the clipped counts.
    ///
    /// The excess is first spread evenly over all bins; whatever does not
    /// divide evenly is added one count at a time, stepping through the bins
    /// at a stride of `BINS / remainder`. The total count is preserved.
    ///
    /// Returns the number of counts that were clipped.
    pub fn clip_and_redistribute(&mut self, limit: u32) -> u32 {
        let mut clipped = 0u32;
        for bin in self.bins.iter_mut() {
            if *bin > limit {
                clipped += *bin - limit;
                *bin = limit;
            }
        }

        let batch = clipped / BINS as u32;
        let mut residual = clipped - batch * BINS as u32;

        for bin in self.bins.iter_mut() {
            *bin += batch;
        }

        if residual > 0 {
            let step = (BINS / residual as usize).max(1);
            let mut i = 0;
            while i < BINS && residual > 0 {
                self.bins[i] += 1;
                residual -= 1;
                i += step;
            }
        }

        clipped
    }

    /// Equalization lookup table: `round(cdf(v) * 255 / area)`.
    ///
    /// `area` is the nominal tile size, which equals `total()` for every
    /// histogram collected over a full tile.
    pub fn equalization_lut(&self, area: u32) -> [u8; BINS] {
        let mut lut = [0u8; BINS];
        if area == 0 {
            return lut;
        }

        let scale = (BINS - 1) as f32 / area as f32;
        let mut sum = 0u32;
        for (entry, &count) in lut.iter_mut().zip(self.bins.iter()) {
            sum += count;
            *entry = (sum as f32 * scale).round_ties_even().clamp(0.0, 255.0) as u8;
        }
        lut
    }
}
