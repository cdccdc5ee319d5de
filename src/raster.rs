use ndarray::{Array3, ArrayView2, ArrayView3, Axis};

use crate::error::{CorrectionError, Result};
use crate::pixels::{Pixel, SubPixel, CHANNELS_PER_PIXEL};

/// An 8-bit RGB image laid out as (height, width, channel).
///
/// Construction checks the shape, so a `Raster` always has exactly three
/// channels and at least one pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Array3<SubPixel>,
}

impl Raster {
    pub fn from_array(data: Array3<SubPixel>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        if channels != CHANNELS_PER_PIXEL {
            return Err(CorrectionError::InvalidChannels(channels));
        }
        if height == 0 || width == 0 {
            return Err(CorrectionError::InvalidDimensions(width, height));
        }
        Ok(Raster { data })
    }

    /// Builds a raster from interleaved row-major RGB samples.
    pub fn from_vec(height: usize, width: usize, samples: Vec<SubPixel>) -> Result<Self> {
        let data = Array3::from_shape_vec((height, width, CHANNELS_PER_PIXEL), samples)
            .map_err(|_| CorrectionError::InvalidDimensions(width, height))?;
        Raster::from_array(data)
    }

    pub fn from_pixels(height: usize, width: usize, pixels: &[Pixel]) -> Result<Self> {
        let samples = pixels.iter().flatten().copied().collect();
        Raster::from_vec(height, width, samples)
    }

    /// A raster where every pixel has the same value.
    pub fn filled(height: usize, width: usize, pixel: Pixel) -> Result<Self> {
        let data = Array3::from_shape_fn((height, width, CHANNELS_PER_PIXEL), |(_, _, c)| pixel[c]);
        Raster::from_array(data)
    }

    /// Wraps samples derived from `self`, which must keep its shape.
    pub(crate) fn with_samples(&self, data: Array3<SubPixel>) -> Raster {
        debug_assert_eq!(data.dim(), self.data.dim());
        Raster { data }
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn pixel_count(&self) -> usize {
        self.height() * self.width()
    }

    pub fn pixel(&self, y: usize, x: usize) -> Pixel {
        [self.data[[y, x, 0]], self.data[[y, x, 1]], self.data[[y, x, 2]]]
    }

    pub fn view(&self) -> ArrayView3<'_, SubPixel> {
        self.data.view()
    }

    pub fn channel(&self, c: usize) -> ArrayView2<'_, SubPixel> {
        self.data.index_axis(Axis(2), c)
    }

    /// Exact per-channel sums over every pixel.
    pub fn channel_sums(&self) -> [u64; CHANNELS_PER_PIXEL] {
        let mut sums = [0u64; CHANNELS_PER_PIXEL];
        for (c, sum) in sums.iter_mut().enumerate() {
            *sum = self.channel(c).fold(0u64, |acc, &v| acc + v as u64);
        }
        sums
    }

    pub fn channel_means(&self) -> [f64; CHANNELS_PER_PIXEL] {
        let count = self.pixel_count() as f64;
        self.channel_sums().map(|sum| sum as f64 / count)
    }

    pub fn into_array(self) -> Array3<SubPixel> {
        self.data
    }

    /// Interleaved row-major RGB samples.
    pub fn to_vec(&self) -> Vec<SubPixel> {
        self.data.iter().copied().collect()
    }
}

impl TryFrom<Array3<SubPixel>> for Raster {
    type Error = CorrectionError;

    fn try_from(data: Array3<SubPixel>) -> Result<Self> {
        Raster::from_array(data)
    }
}
