//! QR code decoder using rqrr

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::path::Path;

/// QR code decoder
pub struct QrDecoder {}

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self {}
    }

    /// Decode a QR code from an image
    pub fn decode(&self, img: &DynamicImage) -> Result<QrPayload> {
        self.decode_gray(img.to_luma8())
    }

    /// Decode the first QR code detected in a grayscale image
    pub fn decode_gray(&self, img: GrayImage) -> Result<QrPayload> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();

        let grid = grids.first().ok_or(Error::NoQrCodeFound)?;

        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                    meta.version,
                    meta.ecc_level,
                    content.len()
                );

                Ok(QrPayload::from_bytes(content.into_bytes()))
            }
            Err(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
        }
    }

    /// Load an image file and decode the first QR code in it
    pub fn decode_file(&self, path: &Path) -> Result<QrPayload> {
        let img = image::open(path)?;
        self.decode(&img)
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of reading one written file back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// File name without its directory
    pub file_name: String,
    /// True when a symbol was found and its trimmed text is non-empty
    pub passed: bool,
    /// Text recovered from the symbol, when decoding got that far
    pub decoded: Option<String>,
}

/// Decode `path` and report whether it holds a readable, non-empty symbol.
///
/// Load and decode errors count as a failed check rather than an error.
pub fn verify_file(decoder: &QrDecoder, path: &Path) -> VerificationResult {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match decoder.decode_file(path) {
        Ok(payload) => {
            let passed = payload.has_content();
            tracing::debug!(file = %file_name, passed, "Verified QR file");
            VerificationResult {
                file_name,
                passed,
                decoded: payload.text,
            }
        }
        Err(err) => {
            tracing::warn!(file = %file_name, error = %err, "QR file failed to decode");
            VerificationResult {
                file_name,
                passed: false,
                decoded: None,
            }
        }
    }
}
