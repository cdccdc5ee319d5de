//! Boundary between encoded image files and [`Raster`].
//!
//! Decoding accepts anything the `image` crate reads and always yields 8-bit
//! RGB. Encoding always writes PNG so the corrected pixels survive unchanged.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::error::{CorrectionError, Result};
use crate::raster::Raster;

pub fn decode(bytes: &[u8]) -> Result<Raster> {
    let image = image::load_from_memory(bytes).map_err(|e| CorrectionError::DecodeError(e.to_string()))?;
    debug!(color = ?image.color(), width = image.width(), height = image.height(), "decoded image");
    from_rgb_image(image.to_rgb8())
}

pub fn from_rgb_image(image: RgbImage) -> Result<Raster> {
    let (width, height) = image.dimensions();
    Raster::from_vec(height as usize, width as usize, image.into_raw())
}

pub fn to_rgb_image(raster: &Raster) -> Result<RgbImage> {
    let (width, height) = (raster.width(), raster.height());
    RgbImage::from_raw(width as u32, height as u32, raster.to_vec())
        .ok_or(CorrectionError::InvalidDimensions(width, height))
}

pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let image = to_rgb_image(raster)?;
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| CorrectionError::EncodeError(e.to_string()))?;
    Ok(buffer.into_inner())
}

pub fn open<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

pub fn save_png<P: AsRef<Path>>(path: P, raster: &Raster) -> Result<()> {
    let bytes = encode_png(raster)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_png_round_trip_keeps_samples() {
        let raster = Raster::from_pixels(2, 2, &[[1, 2, 3], [250, 128, 0], [9, 99, 199], [255, 255, 255]]).unwrap();
        let bytes = encode_png(&raster).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(decode(&bytes).unwrap(), raster);
    }

    #[test]
    fn test_grayscale_source_becomes_rgb() {
        let gray = GrayImage::from_pixel(3, 2, Luma([120]));
        let bytes = encode(DynamicImage::ImageLuma8(gray), ImageFormat::Png);
        let raster = decode(&bytes).unwrap();
        assert_eq!((raster.height(), raster.width()), (2, 3));
        assert_eq!(raster.pixel(1, 2), [120, 120, 120]);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 40]));
        let bytes = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png);
        let raster = decode(&bytes).unwrap();
        assert_eq!(raster.pixel(0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CorrectionError::DecodeError(_)));
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrected_image.png");
        let raster = Raster::filled(3, 4, [12, 34, 56]).unwrap();

        save_png(&path, &raster).unwrap();
        assert_eq!(open(&path).unwrap(), raster);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, CorrectionError::IoError(_)));
    }
}
