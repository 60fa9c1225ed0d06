//! Error types for qrgen operations

use thiserror::Error;

/// Result type alias using qrgen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// A link did not match the accepted URL pattern after scheme normalisation
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No symbol could be built for an entry, even at the largest box size
    #[error("Failed to generate QR code for {name}: {reason}")]
    EncodingFailed {
        /// Display name of the entry that was skipped
        name: String,
        /// Why the encoder gave up
        reason: String,
    },

    /// A written file could not be decoded back to a non-empty payload
    #[error("Verification failed for {0}")]
    VerificationFailed(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
