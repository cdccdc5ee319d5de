pub type SubPixel = u8;
pub type Pixel = [SubPixel; CHANNELS_PER_PIXEL];

pub const CHANNELS_PER_PIXEL: usize = 3;
pub const CHANNEL_NAMES: [char; CHANNELS_PER_PIXEL] = ['r', 'g', 'b'];

// BT.601 luma in 14-bit fixed point, weights sum to 1 << LUMA_SHIFT
pub const R_LUMA_WEIGHT: u32 = 4899;
pub const G_LUMA_WEIGHT: u32 = 9617;
pub const B_LUMA_WEIGHT: u32 = 1868;
pub const LUMA_SHIFT: u32 = 14;
const LUMA_ROUNDING: u32 = 1 << (LUMA_SHIFT - 1);

#[inline]
fn luma(r: SubPixel, g: SubPixel, b: SubPixel) -> SubPixel {
    let y = R_LUMA_WEIGHT * r as u32 + G_LUMA_WEIGHT * g as u32 + B_LUMA_WEIGHT * b as u32;
    ((y + LUMA_ROUNDING) >> LUMA_SHIFT) as SubPixel
}

pub trait PixelOps {
    fn luminance(self) -> SubPixel;
}

impl PixelOps for Pixel {
    fn luminance(self) -> SubPixel {
        let [r, g, b] = self;
        luma(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_are_normalized() {
        assert_eq!(R_LUMA_WEIGHT + G_LUMA_WEIGHT + B_LUMA_WEIGHT, 1 << LUMA_SHIFT);
    }

    #[test]
    fn test_gray_luminance_is_identity() {
        for v in 0..=255u8 {
            assert_eq!([v, v, v].luminance(), v);
        }
    }

    #[test]
    fn test_primaries() {
        assert_eq!([255, 0, 0].luminance(), 76);
        assert_eq!([0, 255, 0].luminance(), 150);
        assert_eq!([0, 0, 255].luminance(), 29);
    }

    #[test]
    fn test_green_dominates_blue() {
        assert!([0, 200, 0].luminance() > [0, 0, 200].luminance());
    }
}
