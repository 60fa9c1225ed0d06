//! Queue a few links, generate them into a scratch directory and print the summary
//!
//! Usage: cargo run --example batch

use qrgen::{BatchGenerator, BatchSettings, ConsoleReporter, QrEncoder, VerifyScope};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let settings = BatchSettings {
        output_dir: "qrcodes-demo".into(),
        create_dir: true,
        verify_scope: VerifyScope::Batch,
    };
    let mut generator = BatchGenerator::new(QrEncoder::new(), settings);

    generator.add_link("example.com", "")?;
    generator.add_link("https://www.rust-lang.org/learn", "Rust (learn)")?;
    generator.add_link("localhost:8080/status", "Local status")?;

    for label in generator.links().labels() {
        println!("queued: {label}");
    }

    let mut reporter = ConsoleReporter::stdout(false);
    let outcome = generator.generate_all(&mut reporter)?;

    for file in &outcome.written {
        println!("  {} <- {}", file.path.display(), file.source_link);
    }

    Ok(())
}
