//! Integration test: CLI interface.
//!
//! Runs the compiled binary as a subprocess to validate argument parsing,
//! help text and error paths — without requiring Whisper models or network
//! access.

use std::process::Command;

/// Helper: find the debug binary path.
fn binary_path() -> std::path::PathBuf {
    // cargo test compiles to target/debug/
    let mut path = std::env::current_exe()
        .expect("current_exe")
        .parent()
        .expect("parent")
        .parent()
        .expect("grandparent")
        .to_path_buf();
    path.push("whisper-transcribe");
    path
}

fn transcribe_cmd() -> Command {
    Command::new(binary_path())
}

/// --help prints usage information and exits successfully.
#[test]
fn cli_help_flag() {
    let output = transcribe_cmd().arg("--help").output().expect("failed to execute");

    assert!(output.status.success(), "exit code should be 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--model"), "help should mention --model");
    assert!(
        stdout.contains("--vad_filter"),
        "help should mention --vad_filter"
    );
    assert!(
        stdout.contains("--compute_type"),
        "help should keep the snake_case flag spelling"
    );
}

/// --version prints version and exits successfully.
#[test]
fn cli_version_flag() {
    let output = transcribe_cmd()
        .arg("--version")
        .output()
        .expect("failed to execute");

    assert!(output.status.success(), "exit code should be 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("whisper-transcribe"),
        "version should contain binary name"
    );
}

/// Invocation without the required file argument produces an error.
#[test]
fn cli_missing_file_argument() {
    let output = transcribe_cmd().output().expect("failed to execute");

    assert!(!output.status.success(), "should fail without input file argument");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error") || stderr.contains("Usage"),
        "error message should indicate missing argument: {}",
        stderr
    );
}

/// Nonexistent input file: non-zero exit and nothing on stdout.
#[test]
fn cli_nonexistent_file() {
    let output = transcribe_cmd()
        .arg("/tmp/definitely_nonexistent_whisper_transcribe_test.wav")
        .output()
        .expect("failed to execute");

    assert!(!output.status.success(), "should fail with nonexistent file");
    assert!(
        output.stdout.is_empty(),
        "no transcript should be written on failure"
    );
}

/// Unknown --device value is rejected before any file or model work.
#[test]
fn cli_invalid_device() {
    let output = transcribe_cmd()
        .args([
            "--device",
            "warp",
            "/tmp/definitely_nonexistent_whisper_transcribe_test.wav",
        ])
        .output()
        .expect("failed to execute");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("device") || stderr.contains("warp"),
        "error should mention the bad device: {}",
        stderr
    );
}

/// Non-integer --beam_size is a parse error.
#[test]
fn cli_invalid_beam_size() {
    let output = transcribe_cmd()
        .args(["--beam_size", "wide", "audio.wav"])
        .output()
        .expect("failed to execute");

    assert!(!output.status.success(), "non-integer beam size should fail");
}
