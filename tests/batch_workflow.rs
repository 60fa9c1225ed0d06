use std::fs;
use std::path::Path;

use qrgen::form::{FormCommand, FormSession};
use qrgen::{
    BatchGenerator, BatchOutcome, BatchSettings, BatchStatus, ConsoleReporter, QrDecoder,
    QrEncoder, VerifyScope,
};

fn generator(dir: &Path, scope: VerifyScope) -> BatchGenerator {
    BatchGenerator::new(
        QrEncoder::new(),
        BatchSettings {
            output_dir: dir.to_path_buf(),
            create_dir: true,
            verify_scope: scope,
        },
    )
}

fn oversized_link() -> String {
    format!("example.com/{}", "x".repeat(4000))
}

#[test]
fn bare_host_generates_verifies_and_clears() {
    let root = tempfile::tempdir().expect("tempdir");
    let out = root.path().join("qrcodes");
    let mut generator = generator(&out, VerifyScope::Batch);

    let entry = generator.add_link("example.com", "").expect("valid link");
    assert_eq!(entry.destination(), "http://example.com");
    assert_eq!(entry.display_name(), "http://example.com");

    let mut reports = Vec::new();
    let outcome = generator
        .generate_all(&mut |o: &BatchOutcome| reports.push(o.status))
        .expect("batch runs");

    assert_eq!(reports, [BatchStatus::Success]);
    assert!(outcome.is_success());
    assert!(generator.links().is_empty());

    let path = out.join("qr_httpexample.com.png");
    assert!(path.is_file(), "missing {}", path.display());
    assert_eq!(outcome.written[0].path, path);
    assert_eq!(outcome.verification.len(), 1);
    assert!(outcome.verification[0].passed);
}

#[test]
fn every_entry_round_trips_byte_for_byte() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut generator = generator(root.path(), VerifyScope::Batch);

    for (link, name) in [
        ("example.com", "plain"),
        ("https://sub.example.org/path/to/page?x=1&y=two", "query"),
        ("localhost:8080/health", "local"),
        ("192.168.1.20", "ipv4"),
    ] {
        generator.add_link(link, name).expect("valid link");
    }
    let expected: Vec<String> = generator
        .links()
        .entries()
        .iter()
        .map(|e| e.destination().to_string())
        .collect();

    let outcome = generator
        .generate_all(&mut |_: &BatchOutcome| {})
        .expect("batch runs");
    assert!(outcome.is_success());

    let decoder = QrDecoder::new();
    for (file, destination) in outcome.written.iter().zip(&expected) {
        assert_eq!(&file.source_link, destination);
        let payload = decoder.decode_file(&file.path).expect("decodes");
        assert_eq!(payload.data, destination.as_bytes());
    }
}

#[test]
fn oversized_entry_is_skipped_and_others_still_written() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut generator = generator(root.path(), VerifyScope::Batch);

    generator.add_link("first.com", "first").expect("valid");
    generator.add_link(&oversized_link(), "huge").expect("valid");
    generator.add_link("last.com", "last").expect("valid");

    let outcome = generator
        .generate_all(&mut |_: &BatchOutcome| {})
        .expect("batch runs");

    assert_eq!(outcome.entry_failures.len(), 1);
    assert_eq!(outcome.entry_failures[0].display_name, "huge");
    assert!(outcome.entry_failures[0].reason.contains("huge"));
    assert!(!root.path().join("qr_huge.png").exists());

    let names: Vec<_> = outcome
        .written
        .iter()
        .map(|f| f.display_name.as_str())
        .collect();
    assert_eq!(names, ["first", "last"]);
    assert!(outcome.is_success());
}

#[test]
fn stale_broken_file_fails_directory_scan_and_keeps_links() {
    let root = tempfile::tempdir().expect("tempdir");
    fs::write(root.path().join("qr_stale.png"), b"garbage").expect("write stale");

    let mut generator = generator(root.path(), VerifyScope::Directory);
    generator.add_link("example.com", "fresh").expect("valid");

    let outcome = generator
        .generate_all(&mut |_: &BatchOutcome| {})
        .expect("batch runs");

    assert_eq!(outcome.status, BatchStatus::Failure);
    assert_eq!(outcome.failed_files(), ["qr_stale.png"]);
    assert_eq!(outcome.verification.len(), 2);
    assert_eq!(generator.links().len(), 1);
}

#[test]
fn batch_scope_ignores_stale_files() {
    let root = tempfile::tempdir().expect("tempdir");
    fs::write(root.path().join("qr_stale.png"), b"garbage").expect("write stale");

    let mut generator = generator(root.path(), VerifyScope::Batch);
    generator.add_link("example.com", "fresh").expect("valid");

    let outcome = generator
        .generate_all(&mut |_: &BatchOutcome| {})
        .expect("batch runs");

    assert!(outcome.is_success());
    assert_eq!(outcome.verification.len(), 1);
    assert_eq!(outcome.verification[0].file_name, "qr_fresh.png");
}

#[test]
fn form_session_drives_a_full_batch() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut generator = generator(root.path(), VerifyScope::Batch);
    let input = "add example.com | My:Link*\nnot a url\nlist\ngenerate\nlist\nquit\nignored.com\n";

    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    let mut session = FormSession::new(&mut generator, Vec::new());
    session
        .run(input.as_bytes(), &mut reporter)
        .expect("session runs");

    let transcript = String::from_utf8(session.into_output()).expect("utf8");
    assert!(transcript.contains("  My:Link*"));
    assert!(transcript.contains("Invalid URL: http://not a url"));
    assert!(transcript.contains("(no links queued)"));

    let report = String::from_utf8(reporter.into_inner()).expect("utf8");
    assert!(report.starts_with("QR code(s) successfully created"));

    assert!(root.path().join("qr_MyLink.png").is_file());
    assert!(generator.links().is_empty());
}

#[test]
fn pipe_in_link_survives_form_parsing_and_decodes_intact() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut generator = generator(root.path(), VerifyScope::Batch);
    let mut reporter = |_: &BatchOutcome| {};

    let mut session = FormSession::new(&mut generator, Vec::new());
    for line in ["http://example.com/a|b", "add http://example.com/c|d | Named"] {
        assert!(
            session
                .handle(FormCommand::parse(line), &mut reporter)
                .expect("handled")
        );
    }
    drop(session);

    let stored: Vec<_> = generator
        .links()
        .entries()
        .iter()
        .map(|e| (e.destination().to_string(), e.display_name().to_string()))
        .collect();
    assert_eq!(
        stored,
        [
            ("http://example.com/a|b".to_string(), "http://example.com/a|b".to_string()),
            ("http://example.com/c|d".to_string(), "Named".to_string()),
        ]
    );

    let outcome = generator.generate_all(&mut reporter).expect("batch runs");
    assert!(outcome.is_success());

    let decoder = QrDecoder::new();
    let payload = decoder
        .decode_file(&outcome.written[0].path)
        .expect("decodes");
    assert_eq!(payload.data, b"http://example.com/a|b");
}

#[test]
fn form_clear_twice_leaves_empty_list() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut generator = generator(root.path(), VerifyScope::Batch);
    let mut reporter = |_: &BatchOutcome| {};

    let mut session = FormSession::new(&mut generator, Vec::new());
    for command in [
        FormCommand::parse("a.com"),
        FormCommand::parse("b.com"),
        FormCommand::Clear,
        FormCommand::Clear,
    ] {
        assert!(session.handle(command, &mut reporter).expect("handled"));
    }
    drop(session);

    assert!(generator.links().is_empty());
}
