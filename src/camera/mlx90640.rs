//! MLX90640 camera backend.
//!
//! Thin adapter over the `mlx9064x` driver crate. The driver owns the I²C
//! bus, loads the factory calibration (EEPROM dump plus parameter
//! extraction) when it is constructed, and performs the raw-frame to
//! temperature conversion when a measurement is read out.

use linux_embedded_hal::I2cdev;
use mlx9064x::{AccessPattern, FrameRate, Mlx90640Driver, Resolution};

use crate::camera::{ThermalCamera, PIXEL_COUNT};
use crate::error::{Error, Result};
use crate::rate::RefreshRate;

/// I²C bus the camera is attached to.
const I2C_BUS: &str = "/dev/i2c-1";
/// Factory-default I²C address of the MLX90640.
const I2C_ADDRESS: u8 = 0x33;
/// Emissivity used for the object temperature calculation.
const EMISSIVITY: f32 = 1.0;

/// Real camera on the Linux I²C bus.
pub struct Mlx90640Camera {
    driver: Mlx90640Driver<I2cdev>,
}

impl Mlx90640Camera {
    /// Open the camera on the default bus and address, loading its
    /// calibration data over I²C.
    pub fn open() -> Result<Self> {
        let bus = I2cdev::new(I2C_BUS)
            .map_err(|e| Error::Other(format!("opening {}: {}", I2C_BUS, e)))?;
        let mut driver = Mlx90640Driver::new(bus, I2C_ADDRESS)?;
        driver.override_emissivity(EMISSIVITY);
        log::info!("MLX90640 on {} at 0x{:02x}", I2C_BUS, I2C_ADDRESS);
        Ok(Self { driver })
    }
}

impl ThermalCamera for Mlx90640Camera {
    fn configure(&mut self, rate: RefreshRate) -> Result<()> {
        self.driver.set_resolution(Resolution::Eighteen)?;
        self.driver.set_access_pattern(AccessPattern::Chess)?;
        let device_rate = match rate {
            RefreshRate::One => FrameRate::One,
            RefreshRate::Two => FrameRate::Two,
            RefreshRate::Four => FrameRate::Four,
            RefreshRate::Eight => FrameRate::Eight,
            RefreshRate::Sixteen => FrameRate::Sixteen,
            RefreshRate::ThirtyTwo => FrameRate::ThirtyTwo,
            RefreshRate::SixtyFour => FrameRate::SixtyFour,
        };
        self.driver.set_frame_rate(device_rate)?;
        Ok(())
    }

    fn next_frame(&mut self, frame: &mut [f32; PIXEL_COUNT]) -> Result<f32> {
        // The driver clears the device's data-ready flag once it has copied
        // a measurement out, so spin until a fresh subpage has landed. The
        // camera updates half the pixels per measurement; the other half
        // keeps its previous temperatures, matching the device's subpage
        // readout model.
        loop {
            if self.driver.generate_image_if_ready(frame.as_mut_slice())? {
                break;
            }
            std::hint::spin_loop();
        }
        self.driver
            .ambient_temperature()
            .ok_or_else(|| Error::Camera("no ambient temperature after measurement".into()))
    }
}
