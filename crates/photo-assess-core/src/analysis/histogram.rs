//! 256-bin intensity histograms.

use image::{GrayImage, RgbImage};

/// 256-bin histogram of 8-bit intensities.
#[derive(Debug, Clone)]
pub struct Histogram {
    bins: [u64; 256],
    total: u64,
}

impl Histogram {
    /// Compute histogram from a grayscale image.
    #[must_use]
    pub fn from_luma(image: &GrayImage) -> Self {
        Self::from_samples(image.pixels().map(|p| p.0[0]))
    }

    /// Compute histogram of one channel (0 = red, 1 = green, 2 = blue).
    #[must_use]
    pub fn from_channel(image: &RgbImage, channel: usize) -> Self {
        Self::from_samples(image.pixels().map(|p| p.0[channel]))
    }

    fn from_samples(samples: impl Iterator<Item = u8>) -> Self {
        let mut bins = [0u64; 256];
        for value in samples {
            bins[usize::from(value)] += 1;
        }
        let total = bins.iter().sum();
        Self { bins, total }
    }

    /// Returns the total sample count.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Count in a single bin.
    #[must_use]
    pub const fn count(&self, value: u8) -> u64 {
        self.bins[value as usize]
    }

    /// Weighted mean intensity. Zero for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: u64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &count)| (i as u64) * count)
            .sum();
        sum as f64 / self.total as f64
    }

    /// Weighted population variance. Zero for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mean = self.mean();
        self.bins
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let diff = (i as f64) - mean;
                diff * diff * (count as f64)
            })
            .sum::<f64>()
            / (self.total as f64)
    }

    /// Population standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
