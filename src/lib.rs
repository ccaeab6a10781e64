//! TaapIO - Thermal camera streaming daemon
//!
//! Acquires temperature frames from an MLX90640 thermal camera at a fixed
//! cadence and streams them over standard output as length-prefixed binary
//! messages, for a parent process attached to the other end of the pipe.
//!
//! ## Features
//!
//! - `mlx90640`: real camera backend over Linux I²C
//! - `mock`: synthetic camera backend for hardware-free development

pub mod camera;
pub mod encode;
pub mod error;
pub mod rate;
pub mod streamer;
pub mod wire;

// Re-export commonly used types
pub use error::{Error, Result};
pub use rate::RefreshRate;
pub use streamer::Streamer;
