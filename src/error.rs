//! Error types for SANXI protocol operations.

use thiserror::Error;

/// Result type alias for SANXI operations.
pub type Result<T> = std::result::Result<T, SanxiError>;

/// Error types for SANXI robot arm communication.
#[derive(Error, Debug)]
pub enum SanxiError {
    /// Serial port enumeration or configuration error
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A bounded wait on the arm expired before it reported completion
    #[error("Timed out waiting for the arm to report completion")]
    Timeout,

    /// Joint axis index outside 1..=6
    #[error("Invalid joint axis: {axis} (valid 1-6)")]
    InvalidAxis {
        /// Axis index that was rejected
        axis: u8,
    },

    /// Motion parameter percentage outside 0..=100
    #[error("{name} out of range: {value}% (valid 0-100)")]
    ParameterOutOfRange {
        /// Name of the rejected parameter
        name: &'static str,
        /// Percentage that was rejected
        value: u8,
    },
}
