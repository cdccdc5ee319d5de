//! Underwater photo color correction.
//!
//! A fixed two stage pipeline over 8-bit RGB rasters: an optional gray-world
//! white balance followed by additive shifts applied per luminance band
//! (shadows, midtones, highlights).

pub mod band;
pub mod codec;
pub mod config;
pub mod error;
pub mod logger;
pub mod parallel;
pub mod pipeline;
pub mod pixels;
pub mod raster;
pub mod white_balance;

pub use band::{band_correct, Band, BandShifts, ShiftTriple};
pub use config::CorrectionParams;
pub use error::{CorrectionError, Result};
pub use pipeline::{correct, correct_batch, correct_bytes, Pipeline};
pub use raster::Raster;
pub use white_balance::white_balance;
