//! Integration tests for the p16-sim CLI.

use clap as _;
use p16_core as _;
use p16_sim as _;
use rstest::rstest;
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_p16-sim"))
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run_sim<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run p16-sim")
}

fn run_image(content: &str) -> (Output, String, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = create_temp_file(temp_dir.path(), "program.img", content);
    let output = run_sim([image]);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output, stdout, stderr)
}

#[test]
fn add_program_reports_final_state() {
    let (output, stdout, stderr) = run_image("0000:1805\n0002:1903\n0004:4204\n0006:F800\n");

    assert_eq!(output.status.code(), Some(0), "stderr: {stderr}");
    assert!(stdout.contains("R0: 0x0005\n"));
    assert!(stdout.contains("R1: 0x0003\n"));
    assert!(stdout.contains("R2: 0x0008\n"));
    assert!(stdout.contains("PC: 0x0008\n"));
    assert!(stdout.contains("C: 0, Ov: 0, Z: 0, S: 0\n"));
    assert!(stderr.is_empty());
}

#[test]
fn ninth_push_fails_after_printing_state() {
    let image: String = std::iter::once("0000:1B2A\n".to_string())
        .chain((1..=9).map(|i| format!("{:04X}:000D\n", i * 2)))
        .collect();

    let (output, stdout, stderr) = run_image(&image);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("R3: 0x002A\n"));
    assert!(stdout.contains("SP: 0x81F0\n"));
    assert!(stdout.contains("0x81F0: 0x002A\n"));
    assert!(stderr.contains("error: stack overflow"));
}

#[test]
fn equal_compare_jumps_to_target() {
    let (output, stdout, _) = run_image(
        "0000:1805\n0002:1905\n0004:0007\n0006:0821\n0008:F800\n000A:1E01\n000E:F800\n",
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("PC: 0x0010\n"));
    assert!(stdout.contains("R6: 0x0000\n"));
    assert!(stdout.contains("C: 0, Ov: 0, Z: 1, S: 0\n"));
}

#[test]
fn unassigned_opcode_fails_without_mutation() {
    let (output, stdout, stderr) = run_image("0000:3800\n");

    assert_eq!(output.status.code(), Some(1));
    for reg in 0..8 {
        assert!(stdout.contains(&format!("R{reg}: 0x0000\n")));
    }
    assert!(stdout.contains("PC: 0x0000\n"));
    assert!(stderr.contains("error: unrecognized instruction 0x3800 at PC=0x0000"));
}

#[test]
fn malformed_lines_are_ignored() {
    let (output, stdout, _) = run_image(
        "# scenario with noise\n0000:1805\nnot a directive\n0002:zzzz\n0002:F800\n",
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("R0: 0x0005\n"));
    assert!(stdout.contains("PC: 0x0004\n"));
}

#[test]
fn non_utf8_comment_line_is_ignored() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = temp_dir.path().join("latin1.img");
    fs::write(&image, b"# instru\xE7\xE3o\n0000:1805\n0002:F800\n").unwrap();

    let output = run_sim([&image]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("R0: 0x0005\n"));
    assert!(stdout.contains("PC: 0x0004\n"));
    assert!(output.stderr.is_empty());
}

#[test]
fn trailing_text_after_value_is_ignored() {
    let (output, stdout, _) = run_image("0000:1805:junk\n0002:F800;halt\n");

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("R0: 0x0005\n"));
    assert!(stdout.contains("PC: 0x0004\n"));
}

#[test]
fn empty_image_runs_to_end_of_memory() {
    let (output, stdout, _) = run_image("");

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("PC: 0xFFFF\n"));
}

#[rstest]
#[case::no_arguments(&[])]
#[case::two_images(&["a.img", "b.img"])]
fn usage_errors_exit_two(#[case] args: &[&str]) {
    let output = run_sim(args);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn missing_image_exits_one() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.img");

    let output = run_sim([&missing]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: cannot read program image"));
}

#[test]
fn debug_logging_reports_skipped_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = create_temp_file(temp_dir.path(), "noisy.img", "junk\n0000:F800\n");

    let output = Command::new(binary_path())
        .arg(&image)
        .env("RUST_LOG", "p16_sim=debug")
        .output()
        .expect("failed to run p16-sim");

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipping malformed image line"));
}
