//! QR code encoding and decoding
//!
//! The encoder turns a destination string into a black-on-white raster,
//! growing the box size until the symbol builds. The decoder reads a raster
//! back so freshly written files can be checked.

mod decoder;
mod encoder;

pub use decoder::{QrDecoder, VerificationResult, verify_file};
pub use encoder::{
    DEFAULT_BORDER, DEFAULT_BOX_SIZE, DEFAULT_BOX_STEP, EncodedSymbol, EncoderSettings,
    MAX_BORDER, MAX_BOX_SIZE, QrEncoder,
};

/// A decoded QR code payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    /// The raw decoded data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether the payload carries any non-whitespace text
    pub fn has_content(&self) -> bool {
        self.as_str().is_some_and(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_payload_has_no_content() {
        assert!(!QrPayload::from_bytes(b"  \n".to_vec()).has_content());
        assert!(!QrPayload::from_bytes(Vec::new()).has_content());
    }

    #[test]
    fn invalid_utf8_has_no_content() {
        let payload = QrPayload::from_bytes(vec![0xFF, 0xFE]);
        assert!(payload.as_str().is_none());
        assert!(!payload.has_content());
    }

    #[test]
    fn text_payload_has_content() {
        assert!(QrPayload::from_bytes(b"http://example.com".to_vec()).has_content());
    }
}
