//! Output files and rendering of batch summaries

mod naming;

pub use naming::{FILE_EXTENSION, FILE_PREFIX, NAME_LIMIT, output_path, sanitize_name, write_png};

use crate::batch::{BatchOutcome, BatchStatus, Reporter};
use serde_json::{Value, json};
use std::io::{self, Write};

/// Combined structured and human-readable representation of a batch outcome
#[derive(Debug, Clone)]
pub struct RenderedOutcome {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Render a batch outcome into both JSON and human-readable forms.
pub fn render_outcome(outcome: &BatchOutcome) -> RenderedOutcome {
    RenderedOutcome {
        json: outcome_value(outcome),
        human: human_lines(outcome),
    }
}

/// Produce a structured JSON representation of the outcome.
pub fn outcome_value(outcome: &BatchOutcome) -> Value {
    let written: Vec<Value> = outcome
        .written
        .iter()
        .map(|file| {
            json!({
                "path": file.path.display().to_string(),
                "source_link": file.source_link,
                "display_name": file.display_name,
                "box_size": file.box_size,
            })
        })
        .collect();

    json!({
        "status": status_label(outcome.status),
        "written": written,
        "skipped": outcome.entry_failures,
        "verification": outcome.verification,
        "failed_files": outcome.failed_files(),
    })
}

fn status_label(status: BatchStatus) -> &'static str {
    match status {
        BatchStatus::Success => "success",
        BatchStatus::Failure => "failure",
    }
}

fn human_lines(outcome: &BatchOutcome) -> Vec<String> {
    let mut lines = Vec::new();

    match outcome.status {
        BatchStatus::Success => {
            lines.push(format!(
                "QR code(s) successfully created ({} written)",
                outcome.written.len()
            ));
        }
        BatchStatus::Failure => {
            lines.push("QR code verification failed".to_string());
            lines.push("Failed files:".to_string());
            lines.extend(
                outcome
                    .verification_errors()
                    .iter()
                    .map(|err| format!("  {err}")),
            );
        }
    }

    if !outcome.entry_failures.is_empty() {
        lines.push("Skipped entries:".to_string());
        for failure in &outcome.entry_failures {
            lines.push(format!("  {}", failure.reason));
        }
    }

    lines
}

/// Reporter printing each outcome to a writer, as JSON or plain lines
pub struct ConsoleReporter<W: Write = io::Stdout> {
    writer: W,
    json: bool,
}

impl ConsoleReporter {
    /// Report to stdout
    pub fn stdout(json: bool) -> Self {
        Self::new(io::stdout(), json)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Report to an arbitrary writer
    pub fn new(writer: W, json: bool) -> Self {
        Self { writer, json }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_outcome(&mut self, outcome: &BatchOutcome) -> io::Result<()> {
        let rendered = render_outcome(outcome);
        if self.json {
            let text = serde_json::to_string_pretty(&rendered.json).map_err(io::Error::other)?;
            writeln!(self.writer, "{text}")?;
        } else {
            for line in &rendered.human {
                writeln!(self.writer, "{line}")?;
            }
        }
        self.writer.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, outcome: &BatchOutcome) {
        if let Err(err) = self.write_outcome(outcome) {
            tracing::error!(error = %err, "Failed to write batch report");
        }
    }
}
