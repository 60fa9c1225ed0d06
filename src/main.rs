//! qrgen command-line entrypoint

use clap::Parser;
use qrgen::form::{FormSession, split_entry};
use qrgen::{
    BatchGenerator, ConsoleReporter, Error, QrEncoder, QrgenConfig, Result, VerifyScope, logging,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrgen",
    version,
    about = "Generate QR code PNGs for links and verify each one by decoding it"
)]
struct Cli {
    /// Links to generate, each `LINK` or `"LINK | NAME"`. Without any, an interactive session starts.
    #[arg(value_name = "ENTRY")]
    entries: Vec<String>,

    /// Optional configuration file (toml/yaml). Defaults to qrgen.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the output directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Verify every PNG in the output directory instead of only this batch's files
    #[arg(long)]
    scan_directory: bool,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = QrgenConfig::load(cli.config.as_deref())?;

    if let Some(ref dir) = cli.output_dir {
        config.output.directory = dir.clone();
    }

    if cli.scan_directory {
        config.output.verify_scope = VerifyScope::Directory;
    }

    logging::init(&config.logging)?;

    let settings = config.batch_settings();
    info!(?settings, "Starting qrgen");

    let encoder = QrEncoder::with_settings(config.encoder_settings());
    let mut generator = BatchGenerator::new(encoder, settings);
    let mut reporter = ConsoleReporter::stdout(cli.json);

    if cli.entries.is_empty() {
        run_interactive(&mut generator, &mut reporter)?;
        return Ok(ExitCode::SUCCESS);
    }

    run_once(&mut generator, &mut reporter, &cli.entries)
}

fn run_interactive(generator: &mut BatchGenerator, reporter: &mut ConsoleReporter) -> Result<()> {
    let stdin = io::stdin();
    let mut session = FormSession::new(generator, io::stdout());
    session.run(stdin.lock(), reporter)
}

fn run_once(
    generator: &mut BatchGenerator,
    reporter: &mut ConsoleReporter,
    entries: &[String],
) -> Result<ExitCode> {
    let mut rejected = 0usize;

    for entry in entries {
        let (link, name) = split_entry(entry);
        match generator.add_link(link, name) {
            Ok(_) => {}
            Err(Error::InvalidUrl(url)) => {
                eprintln!("Invalid URL: {url}");
                rejected += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if generator.links().is_empty() {
        eprintln!("No valid links to generate ({rejected} rejected)");
        return Ok(ExitCode::FAILURE);
    }

    let outcome = generator.generate_all(reporter)?;
    if outcome.is_success() && rejected == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
