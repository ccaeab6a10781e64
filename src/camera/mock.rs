//! Synthetic camera backend.
//!
//! Produces a deterministic thermal scene without hardware: a mild
//! horizontal gradient around a fixed ambient temperature, plus a hot spot
//! that advances one pixel per frame. Useful for developing the parent
//! process against the daemon, and for exercising the streaming loop in
//! tests.

use std::thread;
use std::time::Duration;

use crate::camera::{ThermalCamera, PIXEL_COUNT, WIDTH};
use crate::error::{Error, Result};
use crate::rate::RefreshRate;

/// Ambient temperature reported by the simulator, in °C.
const AMBIENT: f32 = 23.5;
/// Peak temperature of the moving hot spot, in °C.
const HOT_SPOT: f32 = 36.6;
/// Gradient span across one raster row, in °C.
const ROW_SPAN: f32 = 3.0;

/// Simulated thermal camera.
pub struct MockCamera {
    rate: Option<RefreshRate>,
    frames: u64,
    acquisition_delay: Duration,
    fail_after: Option<u64>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            rate: None,
            frames: 0,
            acquisition_delay: Duration::ZERO,
            fail_after: None,
        }
    }

    /// Simulate a device that takes `delay` to produce each frame.
    pub fn with_acquisition_delay(mut self, delay: Duration) -> Self {
        self.acquisition_delay = delay;
        self
    }

    /// Fail with a device fault after `frames` successful frames.
    pub fn failing_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    pub fn frames_produced(&self) -> u64 {
        self.frames
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalCamera for MockCamera {
    fn configure(&mut self, rate: RefreshRate) -> Result<()> {
        log::debug!(
            "mock camera configured: {} fps (register code 0b{:03b})",
            rate.fps(),
            rate.register_code()
        );
        self.rate = Some(rate);
        Ok(())
    }

    fn next_frame(&mut self, frame: &mut [f32; PIXEL_COUNT]) -> Result<f32> {
        if self.rate.is_none() {
            return Err(Error::Camera("mock camera used before configure".into()));
        }
        if let Some(limit) = self.fail_after {
            if self.frames >= limit {
                return Err(Error::Camera("injected device fault".into()));
            }
        }
        if !self.acquisition_delay.is_zero() {
            thread::sleep(self.acquisition_delay);
        }

        for (i, pixel) in frame.iter_mut().enumerate() {
            let column = (i % WIDTH) as f32;
            *pixel = AMBIENT - ROW_SPAN / 2.0 + column * (ROW_SPAN / (WIDTH - 1) as f32);
        }
        frame[self.frames as usize % PIXEL_COUNT] = HOT_SPOT;

        self.frames += 1;
        Ok(AMBIENT)
    }
}
