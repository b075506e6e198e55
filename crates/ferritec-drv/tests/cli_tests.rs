//! Integration tests for the `ferritec` CLI binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn ferritec() -> Command {
    Command::cargo_bin("ferritec").unwrap()
}

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn compiles_a_clean_program_successfully() {
    let file = source_file("let x: int32 = 1;");
    ferritec().arg(file.path()).assert().success();
}

#[test]
fn semantic_error_exits_with_code_one() {
    let file = source_file("let x: bool = 1;");
    ferritec().arg(file.path()).assert().code(1);
}

#[test]
fn missing_file_is_an_internal_error() {
    ferritec()
        .arg("/no/such/file.fe")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn emit_tokens_prints_lexemes_and_stops_before_semantic_errors() {
    let file = source_file("let x: bool = 1;");
    ferritec()
        .arg("--emit-tokens")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Let"));
}

#[test]
fn emit_ast_prints_the_canonical_form() {
    let file = source_file("8 - 4 + 6 * 2 // 5 % 3 ^^ 2 ^^ 2 / 7 as float32;");
    ferritec()
        .arg("--emit-ast")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "(((8 - 4) + ((((6 * 2) // 5) % (3 ^^ (2 ^^ 2))) / 7)) as float32);",
        ));
}

#[test]
fn no_sem_skips_semantic_errors() {
    // Undeclared identifier would fail semantic analysis but not parsing.
    let file = source_file("let x = y + 1;");
    ferritec()
        .arg("--no-sem")
        .arg(file.path())
        .assert()
        .success();
}

#[test]
fn warnings_as_errors_fails_a_program_that_only_warns() {
    let file = source_file("let x: int32 = 1; func f() { let x: int32 = 2; }");
    ferritec()
        .arg("--warnings-as-errors")
        .arg(file.path())
        .assert()
        .code(1);

    ferritec().arg(file.path()).assert().success();
}

#[test]
fn verbose_echoes_phase_progress() {
    let file = source_file("let x: int32 = 1;");
    ferritec()
        .arg("--verbose")
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("parsing"));
}

#[test]
fn unknown_flag_is_rejected() {
    let file = source_file("let x: int32 = 1;");
    ferritec()
        .arg("--not-a-real-flag")
        .arg(file.path())
        .assert()
        .code(2);
}

#[test]
fn multiple_source_files_is_rejected() {
    let a = source_file("let x: int32 = 1;");
    let b = source_file("let y: int32 = 2;");
    ferritec().arg(a.path()).arg(b.path()).assert().code(2);
}
