//! Error types for TaapIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// TaapIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// MLX90640 driver error (I²C fault or malformed device data)
    #[cfg(feature = "mlx90640")]
    #[error("camera error: {0}")]
    Mlx90640(#[from] mlx9064x::Error<linux_embedded_hal::I2cdev>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported frame rate requested
    #[error("unsupported framerate: {0}")]
    UnsupportedFrameRate(u32),

    /// Invalid command-line parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Camera fault outside the driver layer
    #[error("camera fault: {0}")]
    Camera(String),

    /// Frame payload too large for the 16-bit length header
    #[error("payload of {0} bytes exceeds the 16-bit length header")]
    OversizedPayload(usize),

    /// Built without a camera backend
    #[error("no camera backend compiled in (enable the `mlx90640` or `mock` feature)")]
    NoBackend,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
