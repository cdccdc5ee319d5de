use thiserror::Error;

use crate::band::Band;

#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("Invalid channel count: expected 3, got {0}")]
    InvalidChannels(usize),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("{band} shift for channel {channel} is {value}, outside [{min}, {max}]", min = crate::band::SHIFT_MIN, max = crate::band::SHIFT_MAX)]
    ShiftOutOfRange {
        band: Band,
        channel: char,
        value: i32,
    },

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid correction config: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CorrectionError {
    /// True for errors caused by a malformed raster or shift parameter.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CorrectionError::InvalidChannels(_)
                | CorrectionError::InvalidDimensions(..)
                | CorrectionError::ShiftOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CorrectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_family() {
        assert!(CorrectionError::InvalidChannels(4).is_invalid_input());
        assert!(CorrectionError::InvalidDimensions(0, 10).is_invalid_input());
        assert!(CorrectionError::ShiftOutOfRange { band: Band::Shadow, channel: 'r', value: 51 }.is_invalid_input());
        assert!(!CorrectionError::DecodeError("bad".to_string()).is_invalid_input());
        assert!(!CorrectionError::ConfigError("bad".to_string()).is_invalid_input());
    }

    #[test]
    fn test_shift_message() {
        let err = CorrectionError::ShiftOutOfRange { band: Band::Highlight, channel: 'b', value: -60 };
        assert_eq!(err.to_string(), "highlight shift for channel b is -60, outside [-50, 50]");
    }
}
