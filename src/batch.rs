//! Batch generation: encode every queued link, write it, then read it back
//!
//! [`BatchGenerator`] owns the session's [`LinkList`]. One call to
//! [`BatchGenerator::generate_all`] runs the whole batch synchronously and
//! hands exactly one [`BatchOutcome`] to a [`Reporter`].

use crate::error::{Error, Result};
use crate::links::{LinkEntry, LinkList};
use crate::output::{output_path, write_png};
use crate::qr::{QrDecoder, QrEncoder, VerificationResult, verify_file};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which files are read back after a batch has been written
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerifyScope {
    /// Only the files written by the current batch
    #[default]
    Batch,
    /// Every `.png` file in the output directory, including leftovers from earlier runs
    Directory,
}

impl FromStr for VerifyScope {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "batch" => Ok(Self::Batch),
            "directory" | "dir" => Ok(Self::Directory),
            _ => Err(format!(
                "Unsupported verify scope '{value}', expected 'batch' or 'directory'"
            )),
        }
    }
}

/// Where output goes and how it is checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    /// Directory the images are written to
    pub output_dir: PathBuf,
    /// Create the output directory when it is missing instead of failing
    pub create_dir: bool,
    /// Files read back after writing
    pub verify_scope: VerifyScope,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(crate::config::DEFAULT_OUTPUT_DIR),
            create_dir: true,
            verify_scope: VerifyScope::Batch,
        }
    }
}

/// An image written for one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Location of the PNG
    pub path: PathBuf,
    /// Destination encoded into it
    pub source_link: String,
    /// Display name the file name was derived from
    pub display_name: String,
    /// Box size the symbol was rendered at
    pub box_size: u32,
}

/// An entry that produced no file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    /// Display name of the skipped entry
    pub display_name: String,
    /// Its destination
    pub destination: String,
    /// Error message
    pub reason: String,
}

/// Final state of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Every verified file decoded to a non-empty payload; the list was cleared
    Success,
    /// At least one file failed verification; the list was kept
    Failure,
}

/// Phase of the generator between and during batches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Waiting for input
    Idle,
    /// A batch is running
    Generating,
}

/// Everything a reporter needs to summarise one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Overall result
    pub status: BatchStatus,
    /// Files written by this batch, in list order
    pub written: Vec<GeneratedFile>,
    /// Entries skipped because they could not be encoded or written
    pub entry_failures: Vec<EntryFailure>,
    /// One result per file read back
    pub verification: Vec<VerificationResult>,
}

impl BatchOutcome {
    /// Whether the batch ended in [`BatchStatus::Success`]
    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Success
    }

    /// Names of the files that failed verification
    pub fn failed_files(&self) -> Vec<&str> {
        self.verification
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.file_name.as_str())
            .collect()
    }

    /// Failed verifications as errors, in scan order
    pub fn verification_errors(&self) -> Vec<Error> {
        self.failed_files()
            .into_iter()
            .map(|name| Error::VerificationFailed(name.to_string()))
            .collect()
    }
}

/// Receives the single summary produced at the end of each batch
pub trait Reporter {
    /// Present the outcome to the user
    fn report(&mut self, outcome: &BatchOutcome);
}

impl<F> Reporter for F
where
    F: FnMut(&BatchOutcome),
{
    fn report(&mut self, outcome: &BatchOutcome) {
        self(outcome)
    }
}

/// Owns the link list and runs generate-then-verify batches over it
pub struct BatchGenerator {
    links: LinkList,
    encoder: QrEncoder,
    decoder: QrDecoder,
    settings: BatchSettings,
    state: BatchState,
}

impl BatchGenerator {
    /// Create a generator with an empty link list
    pub fn new(encoder: QrEncoder, settings: BatchSettings) -> Self {
        Self {
            links: LinkList::new(),
            encoder,
            decoder: QrDecoder::new(),
            settings,
            state: BatchState::Idle,
        }
    }

    /// Validate and queue a link
    pub fn add_link(&mut self, raw_link: &str, raw_name: &str) -> Result<&LinkEntry> {
        self.links.add_link(raw_link, raw_name)
    }

    /// Drop every queued link
    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// Queued links
    pub fn links(&self) -> &LinkList {
        &self.links
    }

    /// Current phase
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Output settings in effect
    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Encode, write and verify every queued link, then report the outcome.
    ///
    /// Per-entry and per-file failures are collected into the outcome. An
    /// error is returned only when the output directory is unusable, in which
    /// case nothing is written and the reporter is not called.
    pub fn generate_all<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<BatchOutcome> {
        self.prepare_output_dir()?;

        self.state = BatchState::Generating;
        let span = tracing::info_span!("batch", entries = self.links.len());
        let _guard = span.enter();

        let mut written = Vec::new();
        let mut entry_failures = Vec::new();

        for entry in self.links.entries() {
            match self.generate_one(entry) {
                Ok(file) => written.push(file),
                Err(err) => {
                    tracing::warn!(
                        display_name = entry.display_name(),
                        error = %err,
                        "Skipping entry"
                    );
                    entry_failures.push(EntryFailure {
                        display_name: entry.display_name().to_string(),
                        destination: entry.destination().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let verification = self.verify(&written);
        let status = if verification.iter().all(|r| r.passed) {
            BatchStatus::Success
        } else {
            BatchStatus::Failure
        };

        if status == BatchStatus::Success {
            self.links.clear();
        }

        let outcome = BatchOutcome {
            status,
            written,
            entry_failures,
            verification,
        };

        tracing::info!(
            status = ?outcome.status,
            written = outcome.written.len(),
            skipped = outcome.entry_failures.len(),
            failed = outcome.failed_files().len(),
            "Batch finished"
        );

        self.state = BatchState::Idle;
        reporter.report(&outcome);
        Ok(outcome)
    }

    fn generate_one(&self, entry: &LinkEntry) -> Result<GeneratedFile> {
        let symbol = self
            .encoder
            .encode(entry.destination(), entry.display_name())?;
        let path = output_path(&self.settings.output_dir, entry.display_name());
        write_png(&symbol.image, &path)?;

        Ok(GeneratedFile {
            path,
            source_link: entry.destination().to_string(),
            display_name: entry.display_name().to_string(),
            box_size: symbol.box_size,
        })
    }

    fn prepare_output_dir(&self) -> Result<()> {
        let dir = &self.settings.output_dir;
        if dir.is_dir() {
            return Ok(());
        }
        if !self.settings.create_dir {
            return Err(Error::Config(format!(
                "Output directory {} does not exist",
                dir.display()
            )));
        }
        fs::create_dir_all(dir)?;
        tracing::info!(dir = %dir.display(), "Created output directory");
        Ok(())
    }

    fn verify(&self, written: &[GeneratedFile]) -> Vec<VerificationResult> {
        let paths = match self.settings.verify_scope {
            VerifyScope::Batch => batch_paths(written),
            VerifyScope::Directory => match png_files(&self.settings.output_dir) {
                Ok(paths) => paths,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "Could not list output directory, verifying this batch only"
                    );
                    batch_paths(written)
                }
            },
        };

        paths
            .iter()
            .map(|path| verify_file(&self.decoder, path))
            .collect()
    }
}

/// Written paths with duplicates removed, first occurrence wins
fn batch_paths(written: &[GeneratedFile]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::with_capacity(written.len());
    for file in written {
        if !paths.contains(&file.path) {
            paths.push(file.path.clone());
        }
    }
    paths
}

/// Every `.png` file directly inside `dir`, sorted by name
fn png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext == crate::output::FILE_EXTENSION);
        if is_png && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
