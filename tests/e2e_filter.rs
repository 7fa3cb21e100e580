#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn fzr_bin() -> &'static str {
    env!("CARGO_BIN_EXE_fzr")
}

fn run_fzr(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(fzr_bin())
        .args(args)
        .env("FZR_DEFAULT_OPTIONS", "")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run fzr");

    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().expect("wait fzr")
}

#[test]
fn filter_prints_best_matches_first() {
    let output = run_fzr(&["-q", "file", "--path-separator", "/"], b"filter\nbile\nGruntfile\n");

    assert!(output.status.success(), "fzr failed: status={:?}", output.status.code());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Gruntfile\nfilter\n");
}

#[test]
fn filter_exit_code_is_one_on_no_match() {
    let output = run_fzr(&["-q", "zzz"], b"a\nb\nc\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn empty_query_prints_all_input() {
    let output = run_fzr(&[], b"c\na\nb\n");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "c\na\nb\n");
}

#[test]
fn max_results_truncates_output() {
    let output = run_fzr(&["-q", "file", "-n", "1", "--path-separator", "/"], b"filter\nGruntfile\n");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Gruntfile\n");
}

#[test]
fn highlight_with_custom_tags() {
    let output = run_fzr(
        &["-q", "wor", "--highlight", "--tag-open", "<", "--tag-close", ">"],
        b"Hello World\n",
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello <Wor>ld\n");
}

#[test]
fn print_score_prefixes_lines() {
    let output = run_fzr(&["-q", "file", "--print-score"], b"Gruntfile\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let (score, item) = stdout.trim_end().split_once('\t').unwrap();
    assert!(score.parse::<i64>().unwrap() > 0);
    assert_eq!(item, "Gruntfile");
}

#[test]
fn nul_delimited_input_and_output() {
    let output = run_fzr(&["-q", "ab", "--read0", "--print0"], b"a\nb\0xyz\0ab\0");

    assert!(output.status.success());
    assert_eq!(output.stdout, b"ab\0a\nb\0");
}

#[test]
fn default_options_from_env() {
    let mut child = Command::new(fzr_bin())
        .env("FZR_DEFAULT_OPTIONS", "-q zzz")
        .args(["-q", "file"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("run fzr");
    child.stdin.take().unwrap().write_all(b"Gruntfile\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Gruntfile\n");
}

#[test]
fn invalid_separator_is_rejected() {
    let output = run_fzr(&["-q", "a", "--path-separator", "x"], b"a\n");

    assert_eq!(output.status.code(), Some(2));
}
