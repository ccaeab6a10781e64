//! Supported camera refresh rates.

use std::time::Duration;

use crate::error::{Error, Result};

/// The refresh rates the camera supports, together with their 3-bit
/// control-register encoding.
///
/// Higher rates need a faster I²C bus, and the parent process has to keep
/// up with one framed message per frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum RefreshRate {
    /// 1 Hz
    One,
    /// 2 Hz, the camera's power-on default
    Two,
    /// 4 Hz
    Four,
    /// 8 Hz
    Eight,
    /// 16 Hz
    Sixteen,
    /// 32 Hz
    ThirtyTwo,
    /// 64 Hz
    SixtyFour,
}

impl RefreshRate {
    /// Map a requested frames-per-second value onto a supported rate.
    ///
    /// Anything other than the seven supported values is a configuration
    /// error.
    pub fn from_fps(fps: u32) -> Result<Self> {
        match fps {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            32 => Ok(Self::ThirtyTwo),
            64 => Ok(Self::SixtyFour),
            other => Err(Error::UnsupportedFrameRate(other)),
        }
    }

    /// The rate in frames per second.
    pub fn fps(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
            Self::SixtyFour => 64,
        }
    }

    /// The 3-bit refresh-rate field of the camera's control register.
    pub fn register_code(self) -> u8 {
        match self {
            Self::One => 0b001,
            Self::Two => 0b010,
            Self::Four => 0b011,
            Self::Eight => 0b100,
            Self::Sixteen => 0b101,
            Self::ThirtyTwo => 0b110,
            Self::SixtyFour => 0b111,
        }
    }

    /// Nominal time between frames at this rate.
    pub fn interval(self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps()))
    }
}

impl Default for RefreshRate {
    fn default() -> Self {
        Self::Two
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fps_supported() {
        assert_eq!(RefreshRate::from_fps(1).unwrap(), RefreshRate::One);
        assert_eq!(RefreshRate::from_fps(2).unwrap(), RefreshRate::Two);
        assert_eq!(RefreshRate::from_fps(4).unwrap(), RefreshRate::Four);
        assert_eq!(RefreshRate::from_fps(8).unwrap(), RefreshRate::Eight);
        assert_eq!(RefreshRate::from_fps(16).unwrap(), RefreshRate::Sixteen);
        assert_eq!(RefreshRate::from_fps(32).unwrap(), RefreshRate::ThirtyTwo);
        assert_eq!(RefreshRate::from_fps(64).unwrap(), RefreshRate::SixtyFour);
    }

    #[test]
    fn from_fps_unsupported() {
        for fps in [0, 3, 5, 7, 10, 30, 60, 65, 100, 1000] {
            match RefreshRate::from_fps(fps) {
                Err(Error::UnsupportedFrameRate(reported)) => assert_eq!(reported, fps),
                other => panic!("expected UnsupportedFrameRate for {} fps, got {:?}", fps, other),
            }
        }
    }

    #[test]
    fn register_codes() {
        assert_eq!(RefreshRate::One.register_code(), 0b001);
        assert_eq!(RefreshRate::Two.register_code(), 0b010);
        assert_eq!(RefreshRate::Four.register_code(), 0b011);
        assert_eq!(RefreshRate::Eight.register_code(), 0b100);
        assert_eq!(RefreshRate::Sixteen.register_code(), 0b101);
        assert_eq!(RefreshRate::ThirtyTwo.register_code(), 0b110);
        assert_eq!(RefreshRate::SixtyFour.register_code(), 0b111);
    }

    #[test]
    fn interval_is_exact() {
        for rate in [
            RefreshRate::One,
            RefreshRate::Two,
            RefreshRate::Four,
            RefreshRate::Eight,
            RefreshRate::Sixteen,
            RefreshRate::ThirtyTwo,
            RefreshRate::SixtyFour,
        ] {
            assert_eq!(
                rate.interval().as_micros(),
                1_000_000 / u128::from(rate.fps())
            );
        }
    }

    #[test]
    fn default_rate() {
        assert_eq!(RefreshRate::default(), RefreshRate::Two);
    }
}
