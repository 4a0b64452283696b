//! Per-channel color balance statistics.

use image::RgbImage;

use super::Histogram;
use crate::domain::{ChannelStats, ColorBalance};

/// Computes average, balance ratio and variance for each RGB channel.
///
/// The balance ratio is the channel average over the mean of the three
/// averages, or 1 for every channel when that mean is zero.
#[must_use]
pub fn color_balance(image: &RgbImage) -> ColorBalance {
    let [red, green, blue] = [0, 1, 2].map(|c| Histogram::from_channel(image, c));
    let averages = [red.mean(), green.mean(), blue.mean()];
    let overall = averages.iter().sum::<f64>() / 3.0;

    let stats = |hist: &Histogram, average: f64| ChannelStats {
        average,
        balance: if overall > 0.0 { average / overall } else { 1.0 },
        variance: hist.variance(),
    };

    ColorBalance {
        red: stats(&red, averages[0]),
        green: stats(&green, averages[1]),
        blue: stats(&blue, averages[2]),
    }
}

impl ColorBalance {
    /// Mean of the three channel averages.
    #[must_use]
    pub fn mean_intensity(&self) -> f64 {
        (self.red.average + self.green.average + self.blue.average) / 3.0
    }
}
