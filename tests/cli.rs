//! Exercises the `editorconfig` binary's surface: exit codes, multi-file
//! prefixing, and the `-f`/`-b`/`-v` flags.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cmd() -> Command {
    Command::cargo_bin("editorconfig").unwrap()
}

#[test]
fn prints_sorted_key_value_pairs_for_a_single_file() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join(".editorconfig"), "[*]\nindent_style=tab\ncharset=utf-8").unwrap();
    let target = tmp.path().join("a.rs");
    fs::write(&target, "").unwrap();

    cmd()
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("charset=utf-8\n"));
}

#[test]
fn prefixes_each_block_with_the_filename_for_multiple_files() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join(".editorconfig"), "[*]\nfoo=bar").unwrap();
    let a = tmp.path().join("a.rs");
    let b = tmp.path().join("b.rs");
    fs::write(&a, "").unwrap();
    fs::write(&b, "").unwrap();

    cmd()
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("[{}]", a.display())))
        .stdout(predicate::str::contains(format!("[{}]", b.display())));
}

#[test]
fn exits_2_on_invalid_value() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join(".editorconfig"), "[*]\nindent_style=4spaces").unwrap();
    let target = tmp.path().join("a.rs");
    fs::write(&target, "").unwrap();

    cmd().arg(&target).assert().code(2);
}

#[test]
fn version_flag_prints_and_exits_zero() {
    cmd().arg("-v").assert().success().stdout(predicate::str::contains("EditorConfig"));
}

#[test]
fn dash_f_overrides_the_conf_filename() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("myconfig"), "[*]\nfoo=bar").unwrap();
    let target = tmp.path().join("a.rs");
    fs::write(&target, "").unwrap();

    cmd()
        .arg("-f")
        .arg("myconfig")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("foo=bar"));
}
