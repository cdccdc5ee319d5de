//! Gray-world white balance.
//!
//! Underwater light loses red first, so raw shots carry a blue/green cast.
//! Scaling each channel so that all three channel means meet at their common
//! average removes the cast.

use ndarray::{Array3, Axis};

use crate::parallel::pixel_zip;
use crate::pixels::{SubPixel, CHANNELS_PER_PIXEL};
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelGains(pub [f32; CHANNELS_PER_PIXEL]);

impl ChannelGains {
    pub const NEUTRAL: ChannelGains = ChannelGains([1.0; CHANNELS_PER_PIXEL]);

    pub fn is_neutral(&self) -> bool {
        *self == ChannelGains::NEUTRAL
    }

    /// Scales every sample by its channel gain, rounding and clipping to 0..=255.
    pub fn apply(&self, raster: &Raster) -> Raster {
        let view = raster.view();
        let mut balanced = Array3::<SubPixel>::zeros(view.dim());
        for (c, &gain) in self.0.iter().enumerate() {
            let source = view.index_axis(Axis(2), c);
            let mut target = balanced.index_axis_mut(Axis(2), c);
            pixel_zip!((out in &mut target, &v in &source) *out = (v as f32 * gain).round().clamp(0.0, 255.0) as SubPixel);
        }
        raster.with_samples(balanced)
    }
}

/// Per-channel gains that bring each channel mean to the average of all three.
///
/// A channel whose mean is zero carries nothing to rescale and keeps a gain
/// of 1.0.
pub fn channel_gains(raster: &Raster) -> ChannelGains {
    let sums = raster.channel_sums();
    let total: u64 = sums.iter().sum();

    // avg / mean_c == total / (3 * sum_c), exact when the means already agree
    ChannelGains(sums.map(|sum| {
        if sum == 0 {
            1.0
        } else {
            (total as f64 / (CHANNELS_PER_PIXEL as u64 * sum) as f64) as f32
        }
    }))
}

pub fn white_balance(raster: &Raster) -> Raster {
    let gains = channel_gains(raster);
    tracing::debug!(gains = ?gains.0, "gray-world gains");
    if gains.is_neutral() {
        return raster.clone();
    }
    gains.apply(raster)
}
