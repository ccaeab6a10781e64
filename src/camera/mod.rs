//! Camera backends and the capability boundary the streamer drives.

use crate::error::Result;
use crate::rate::RefreshRate;

#[cfg(feature = "mlx90640")]
mod mlx90640;
#[cfg(feature = "mlx90640")]
pub use mlx90640::Mlx90640Camera;

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCamera;

/// Sensor raster width in pixels.
pub const WIDTH: usize = 32;
/// Sensor raster height in pixels.
pub const HEIGHT: usize = 24;
/// Pixels per temperature frame (32×24 raster, row-major).
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Capability boundary over the sensor driver.
///
/// Constructing a backend performs the one-time calibration load (EEPROM
/// dump and parameter extraction). After that the streamer calls
/// [`configure`](ThermalCamera::configure) once and then
/// [`next_frame`](ThermalCamera::next_frame) every cycle.
pub trait ThermalCamera {
    /// Apply one-time device configuration: control-register settings,
    /// the chess readout pattern, and the refresh rate.
    fn configure(&mut self, rate: RefreshRate) -> Result<()>;

    /// Block until the device has a fresh measurement, then write the
    /// per-pixel object temperatures (°C) into `frame`.
    ///
    /// Returns the ambient temperature estimate for diagnostics.
    fn next_frame(&mut self, frame: &mut [f32; PIXEL_COUNT]) -> Result<f32>;
}

/// Create the camera backend selected at compile time.
pub fn create_camera() -> Result<Box<dyn ThermalCamera>> {
    #[cfg(feature = "mlx90640")]
    return Ok(Box::new(Mlx90640Camera::open()?));

    #[cfg(all(feature = "mock", not(feature = "mlx90640")))]
    return Ok(Box::new(MockCamera::new()));

    #[cfg(not(any(feature = "mlx90640", feature = "mock")))]
    Err(crate::error::Error::NoBackend)
}
