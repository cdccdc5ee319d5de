use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::band::{BandShifts, ShiftTriple};
use crate::error::{CorrectionError, Result};

/// The TOML correction preset as written on disk.
///
/// ```toml
/// white_balance = true
///
/// [shadows]
/// r = 10
/// b = -10
///
/// [highlights]
/// r = -5
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default = "default_white_balance")]
    pub white_balance: bool,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub shadows: ShiftTriple,
    #[serde(default)]
    pub midtones: ShiftTriple,
    #[serde(default)]
    pub highlights: ShiftTriple,
}

impl Default for RawConfig {
    fn default() -> Self {
        RawConfig {
            white_balance: default_white_balance(),
            strict: false,
            shadows: ShiftTriple::ZERO,
            midtones: ShiftTriple::ZERO,
            highlights: ShiftTriple::ZERO,
        }
    }
}

fn default_white_balance() -> bool {
    true
}

/// Everything one correction run needs. Shifts are already inside
/// [`SHIFT_MIN`](crate::band::SHIFT_MIN)..=[`SHIFT_MAX`](crate::band::SHIFT_MAX).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionParams {
    pub white_balance: bool,
    pub shifts: BandShifts,
}

impl Default for CorrectionParams {
    fn default() -> Self {
        CorrectionParams {
            white_balance: true,
            shifts: BandShifts::default(),
        }
    }
}

impl CorrectionParams {
    /// Clamps out-of-range shifts, or rejects them when `strict` is set.
    pub fn new(white_balance: bool, shifts: BandShifts, strict: bool) -> Result<Self> {
        let shifts = if strict { shifts.validate()? } else { shifts.clamped() };
        Ok(CorrectionParams { white_balance, shifts })
    }
}

impl TryFrom<RawConfig> for CorrectionParams {
    type Error = CorrectionError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let shifts = BandShifts::new(raw.shadows, raw.midtones, raw.highlights);
        CorrectionParams::new(raw.white_balance, shifts, raw.strict)
    }
}

pub fn parse_raw_config(data: &str) -> Result<RawConfig> {
    toml::from_str(data).map_err(|e| CorrectionError::ConfigError(e.to_string()))
}

pub fn parse_config(data: &str) -> Result<CorrectionParams> {
    parse_raw_config(data)?.try_into()
}

pub fn load_raw_config<P: AsRef<Path>>(config_path: P) -> Result<RawConfig> {
    let data = std::fs::read_to_string(config_path)?;
    parse_raw_config(&data)
}

pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<CorrectionParams> {
    load_raw_config(config_path)?.try_into()
}
