//! End-to-end tests driving the `faxc` binary itself.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn faxc() -> Command {
    Command::cargo_bin("faxc").unwrap()
}

fn source_file(contents: &str) -> NamedTempFile {
    let file = tempfile::Builder::new().suffix(".c").tempfile().unwrap();
    fs::write(file.path(), contents).unwrap();
    file
}

#[test]
fn missing_argument_fails() {
    faxc().assert().failure();
}

#[test]
fn literal_return_emits_expected_assembly() {
    let file = source_file("return 42;\n");
    faxc()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("section .text"))
        .stdout(predicate::str::contains("global _start"))
        .stdout(predicate::str::contains("mov rax, 42"));
}

#[test]
fn constant_folded_arithmetic_initializer() {
    let file = source_file("int x = 2 + 3 * 4;\n");
    faxc()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("14"));
}

#[test]
fn while_loop_control_flow_compiles() {
    let source = "int n = 10; int s = 0;\nwhile (n) { s = s + n; n = n - 1; }\nreturn s;\n";
    let file = source_file(source);
    faxc()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("jmp"))
        .stdout(predicate::str::contains("je"));
}

#[test]
fn undeclared_variable_is_reported_on_stderr_and_fails() {
    let file = source_file("int a = b;\n");
    faxc()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("undeclared variable"));
}

#[test]
fn output_flag_writes_assembly_to_a_file() {
    let file = source_file("return 1;\n");
    let out = NamedTempFile::new().unwrap();
    faxc()
        .arg(file.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success();
    let asm = fs::read_to_string(out.path()).unwrap();
    assert!(asm.contains("section .text"));
}

#[test]
fn nonexistent_source_path_fails_with_a_read_error() {
    faxc()
        .arg("/no/such/file.c")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn emit_tokens_prints_the_token_stream_and_stops_before_codegen() {
    let file = source_file("return 42;\n");
    faxc()
        .arg(file.path())
        .arg("--emit-tokens")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Return"));
}

#[test]
fn emit_ast_prints_the_ast_and_stops_before_codegen() {
    let file = source_file("return 42;\n");
    faxc()
        .arg(file.path())
        .arg("--emit-ast")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Return"));
}
