//! QR code encoder

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage, Luma, imageops};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

/// Box size the first attempt renders with, in pixels per module
pub const DEFAULT_BOX_SIZE: u32 = 20;
/// Increment applied to the box size after a capacity failure
pub const DEFAULT_BOX_STEP: u32 = 5;
/// Largest box size attempted before an entry is given up on
pub const MAX_BOX_SIZE: u32 = 100;
/// White border around the symbol, in modules
pub const DEFAULT_BORDER: u32 = 1;
/// Widest border accepted, in modules
pub const MAX_BORDER: u32 = 10;

/// Tunables for the box-size search and the rendered raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Box size of the first attempt
    pub initial_box_size: u32,
    /// Growth per retry
    pub box_step: u32,
    /// Ceiling; the search stops once the box size exceeds it (at most [`MAX_BOX_SIZE`])
    pub max_box_size: u32,
    /// Quiet zone width in modules (at most [`MAX_BORDER`])
    pub border: u32,
    /// Error correction level
    pub ecc_level: EcLevel,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            initial_box_size: DEFAULT_BOX_SIZE,
            box_step: DEFAULT_BOX_STEP,
            max_box_size: MAX_BOX_SIZE,
            border: DEFAULT_BORDER,
            ecc_level: EcLevel::M,
        }
    }
}

/// A rendered symbol and the parameters it was built with
#[derive(Debug, Clone)]
pub struct EncodedSymbol {
    /// Black-on-white raster, border included
    pub image: DynamicImage,
    /// Box size the symbol was rendered at
    pub box_size: u32,
    /// Width of the symbol in modules, border excluded
    pub modules: usize,
}

/// QR code encoder
pub struct QrEncoder {
    settings: EncoderSettings,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (Medium ECC, box size 20, border 1)
    pub fn new() -> Self {
        Self::with_settings(EncoderSettings::default())
    }

    /// Create an encoder with explicit settings.
    ///
    /// Box sizes are held within `1..=MAX_BOX_SIZE` and the border within
    /// `0..=MAX_BORDER`.
    pub fn with_settings(settings: EncoderSettings) -> Self {
        let settings = EncoderSettings {
            initial_box_size: settings.initial_box_size.clamp(1, MAX_BOX_SIZE),
            box_step: settings.box_step.max(1),
            max_box_size: settings.max_box_size.min(MAX_BOX_SIZE),
            border: settings.border.min(MAX_BORDER),
            ..settings
        };
        Self { settings }
    }

    /// Settings in effect after clamping
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    /// Encode `destination` into a raster image.
    ///
    /// The symbol version is picked automatically. When the data does not fit,
    /// the box size grows by the configured step and the attempt is repeated
    /// until the box size passes the ceiling, at which point the entry fails
    /// with [`Error::EncodingFailed`] naming `display_name`.
    pub fn encode(&self, destination: &str, display_name: &str) -> Result<EncodedSymbol> {
        let mut box_size = self.settings.initial_box_size;

        while box_size <= self.settings.max_box_size {
            let attempt = QrCode::with_error_correction_level(
                destination.as_bytes(),
                self.settings.ecc_level,
            );
            match attempt {
                Ok(code) => {
                    tracing::debug!(
                        display_name,
                        box_size,
                        version = ?code.version(),
                        "Encoded QR symbol"
                    );
                    return self.render(&code, box_size, display_name);
                }
                Err(QrError::DataTooLong) => {
                    tracing::debug!(
                        display_name,
                        box_size,
                        "Payload does not fit, growing box size"
                    );
                    match box_size.checked_add(self.settings.box_step) {
                        Some(next) => box_size = next,
                        None => break,
                    }
                }
                Err(e) => {
                    return Err(Error::EncodingFailed {
                        name: display_name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(Error::EncodingFailed {
            name: display_name.to_string(),
            reason: format!(
                "data exceeds symbol capacity at every box size up to {}",
                self.settings.max_box_size
            ),
        })
    }

    fn render(&self, code: &QrCode, box_size: u32, display_name: &str) -> Result<EncodedSymbol> {
        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(box_size, box_size)
            .dark_color(Luma([0]))
            .light_color(Luma([255]))
            .build();

        let margin = self.settings.border.checked_mul(box_size);
        let padded = |side: u32| margin?.checked_mul(2)?.checked_add(side);
        let (Some(margin), Some(width), Some(height)) =
            (margin, padded(symbol.width()), padded(symbol.height()))
        else {
            return Err(Error::EncodingFailed {
                name: display_name.to_string(),
                reason: format!("raster size overflows at box size {box_size}"),
            });
        };

        let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));
        imageops::overlay(&mut canvas, &symbol, i64::from(margin), i64::from(margin));

        Ok(EncodedSymbol {
            image: DynamicImage::ImageLuma8(canvas),
            box_size,
            modules: code.width(),
        })
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
