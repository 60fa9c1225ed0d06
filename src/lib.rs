//! qrgen - batch QR code generation with read-back verification
//!
//! Collects links, writes one QR code PNG per link and then decodes every
//! written file again to make sure it scans.
//!
//! # Features
//!
//! - **Link validation**: bare hosts get an `http://` scheme, then the URL shape is checked
//! - **Adaptive encoding**: the box size grows until the symbol builds or a ceiling is hit
//! - **Read-back verification**: every written PNG is decoded with `rqrr`
//! - **Pluggable reporting**: one summary per batch, delivered to any [`Reporter`]
//!
//! # Example
//!
//! ```no_run
//! use qrgen::{BatchGenerator, BatchOutcome, BatchSettings, QrEncoder};
//!
//! fn main() -> qrgen::Result<()> {
//!     let mut generator = BatchGenerator::new(QrEncoder::new(), BatchSettings::default());
//!     generator.add_link("example.com", "Example")?;
//!
//!     let outcome = generator.generate_all(&mut |outcome: &BatchOutcome| {
//!         println!("failed files: {:?}", outcome.failed_files());
//!     })?;
//!     assert!(outcome.is_success());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod batch;
pub mod config;
pub mod error;
pub mod form;
pub mod links;
pub mod logging;
pub mod output;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use batch::{
    BatchGenerator, BatchOutcome, BatchSettings, BatchState, BatchStatus, EntryFailure,
    GeneratedFile, Reporter, VerifyScope,
};
pub use config::{
    EccLevel, EncoderOptions, LogRotation, LoggingOptions, OutputOptions, QrgenConfig,
};
pub use links::{LinkEntry, LinkList};
pub use output::ConsoleReporter;
pub use qr::{
    EncodedSymbol, EncoderSettings, QrDecoder, QrEncoder, QrPayload, VerificationResult,
};
