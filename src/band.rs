//! Tri-band tonal correction.
//!
//! Pixels are split into shadows, midtones and highlights by their luma and
//! each band gets its own additive RGB shift. Band membership comes from the
//! input luma, before any shift is applied.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CorrectionError, Result};
use crate::parallel::pixel_zip;
use crate::pixels::{PixelOps, SubPixel, CHANNELS_PER_PIXEL, CHANNEL_NAMES};
use crate::raster::Raster;

/// Luma below this is a shadow.
pub const SHADOW_LIMIT: SubPixel = 85;
/// Luma at or above this is a highlight.
pub const HIGHLIGHT_START: SubPixel = 170;

pub const SHIFT_MIN: i32 = -50;
pub const SHIFT_MAX: i32 = 50;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Shadow,
    Midtone,
    Highlight,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Shadow, Band::Midtone, Band::Highlight];

    pub fn of(luma: SubPixel) -> Band {
        if luma < SHADOW_LIMIT {
            Band::Shadow
        } else if luma < HIGHLIGHT_START {
            Band::Midtone
        } else {
            Band::Highlight
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Band::Shadow => "shadow",
            Band::Midtone => "midtone",
            Band::Highlight => "highlight",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ShiftTriple {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl ShiftTriple {
    pub const ZERO: ShiftTriple = ShiftTriple { r: 0, g: 0, b: 0 };

    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        ShiftTriple { r, g, b }
    }

    pub fn deltas(self) -> [i32; CHANNELS_PER_PIXEL] {
        [self.r, self.g, self.b]
    }

    pub fn is_zero(self) -> bool {
        self == ShiftTriple::ZERO
    }

    pub fn clamped(self) -> Self {
        let [r, g, b] = self.deltas().map(|d| d.clamp(SHIFT_MIN, SHIFT_MAX));
        ShiftTriple { r, g, b }
    }

    /// Rejects any delta outside [`SHIFT_MIN`, `SHIFT_MAX`].
    pub fn validate(self, band: Band) -> Result<Self> {
        for (channel, value) in CHANNEL_NAMES.into_iter().zip(self.deltas()) {
            if !(SHIFT_MIN..=SHIFT_MAX).contains(&value) {
                return Err(CorrectionError::ShiftOutOfRange { band, channel, value });
            }
        }
        Ok(self)
    }
}

/// Parses `"r,g,b"`, e.g. `"10,0,-10"`.
impl FromStr for ShiftTriple {
    type Err = CorrectionError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts[..] else {
            return Err(CorrectionError::ConfigError(format!(
                "expected three comma separated values, got {s:?}"
            )));
        };
        let parse = |v: &str| {
            v.parse::<i32>()
                .map_err(|e| CorrectionError::ConfigError(format!("invalid shift {v:?}: {e}")))
        };
        Ok(ShiftTriple::new(parse(r)?, parse(g)?, parse(b)?))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BandShifts {
    pub shadows: ShiftTriple,
    pub midtones: ShiftTriple,
    pub highlights: ShiftTriple,
}

impl BandShifts {
    pub fn new(shadows: ShiftTriple, midtones: ShiftTriple, highlights: ShiftTriple) -> Self {
        BandShifts { shadows, midtones, highlights }
    }

    pub fn get(&self, band: Band) -> ShiftTriple {
        match band {
            Band::Shadow => self.shadows,
            Band::Midtone => self.midtones,
            Band::Highlight => self.highlights,
        }
    }

    pub fn is_zero(&self) -> bool {
        Band::ALL.iter().all(|&band| self.get(band).is_zero())
    }

    pub fn clamped(self) -> Self {
        BandShifts::new(self.shadows.clamped(), self.midtones.clamped(), self.highlights.clamped())
    }

    pub fn validate(self) -> Result<Self> {
        for band in Band::ALL {
            self.get(band).validate(band)?;
        }
        Ok(self)
    }

    pub fn apply(&self, raster: &Raster) -> Raster {
        if self.is_zero() {
            return raster.clone();
        }
        let masks = BandMasks::from_luminance(&luminance_map(raster));

        let mut work = raster.view().mapv(i32::from);
        for band in Band::ALL {
            let mask = masks.get(band);
            for (c, delta) in self.get(band).deltas().into_iter().enumerate() {
                if delta == 0 {
                    continue;
                }
                let mut channel = work.index_axis_mut(Axis(2), c);
                pixel_zip!((v in &mut channel, &inside in mask) if inside { *v = v.saturating_add(delta) });
            }
        }

        raster.with_samples(work.mapv(|v| v.clamp(0, 255) as SubPixel))
    }
}

/// Per-pixel luma of a raster.
pub fn luminance_map(raster: &Raster) -> Array2<SubPixel> {
    let mut luminance = Array2::<SubPixel>::zeros((raster.height(), raster.width()));
    let (red, green, blue) = (raster.channel(0), raster.channel(1), raster.channel(2));
    pixel_zip!((y in &mut luminance, &r in &red, &g in &green, &b in &blue) *y = [r, g, b].luminance());
    luminance
}

/// Disjoint boolean masks that together cover every pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandMasks {
    pub shadow: Array2<bool>,
    pub midtone: Array2<bool>,
    pub highlight: Array2<bool>,
}

impl BandMasks {
    pub fn from_luminance(luminance: &Array2<SubPixel>) -> Self {
        BandMasks {
            shadow: luminance.mapv(|y| Band::of(y) == Band::Shadow),
            midtone: luminance.mapv(|y| Band::of(y) == Band::Midtone),
            highlight: luminance.mapv(|y| Band::of(y) == Band::Highlight),
        }
    }

    pub fn get(&self, band: Band) -> &Array2<bool> {
        match band {
            Band::Shadow => &self.shadow,
            Band::Midtone => &self.midtone,
            Band::Highlight => &self.highlight,
        }
    }
}

/// Shifts every pixel by the triple of the band its luma falls in,
/// saturating at 0 and 255.
pub fn band_correct(
    raster: &Raster,
    shadow: ShiftTriple,
    midtone: ShiftTriple,
    highlight: ShiftTriple,
) -> Raster {
    BandShifts::new(shadow, midtone, highlight).apply(raster)
}
