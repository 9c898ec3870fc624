//! Command-line behavior of the `monkey` binary

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use monkey::lexer::{tokenize, Token};

fn script(name: &str, source: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, source).unwrap();
    path
}

fn monkey() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_monkey"));
    command.env_remove("RUST_LOG");
    command
}

fn run(args: &[&str]) -> Output {
    monkey().args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_run_file_prints_final_value() {
    let path = script("cli_run_value.mk", "let half = fn(n) { n / 2 };\nhalf(-7)\n");
    let output = run(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "-4\n");
}

#[test]
fn test_run_file_error_exits_with_one() {
    let path = script("cli_run_error.mk", "let a = 1;\nx + a\n");
    let output = run(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("Error: Undefined identifier: x"));
}

#[test]
fn test_run_file_parse_error_exits_with_one() {
    let path = script("cli_parse_error.mk", "let = 5;");
    let output = run(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Unexpected token ASSIGN"));
}

#[test]
fn test_missing_file_fails() {
    let output = run(&["/nonexistent/monkey/script.mk"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to read source file"));
}

#[test]
fn test_ast_mode() {
    let path = script("cli_ast.mk", "let x = 1 + 2;");
    let output = run(&["--ast", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "Program\n  LetStatement x\n    InfixExpression +\n      IntegerLiteral 1\n      IntegerLiteral 2\n"
    );
}

#[test]
fn test_tokens_mode_prints_json() {
    let source = "let s = \"hi\";\nif (s != 1) { s }";
    let path = script("cli_tokens.mk", source);
    let output = run(&["--tokens", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let tokens: Vec<Token> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(tokens, tokenize(source));
}

#[test]
fn test_bad_usage_exits_with_two() {
    for args in [
        vec!["--bogus"],
        vec!["--ast"],
        vec!["a.mk", "b.mk"],
        vec!["--tokens", "a.mk", "b.mk"],
    ] {
        let output = run(&args);
        assert_eq!(output.status.code(), Some(2), "args: {:?}", args);
        assert!(stderr(&output).contains("Usage: monkey"), "args: {:?}", args);
    }
}

#[test]
fn test_no_arguments_starts_repl() {
    let mut child = monkey()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"let a = 2;\na * 21\n:quit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains(">> 2\n"), "stdout: {}", out);
    assert!(out.contains(">> 42\n"), "stdout: {}", out);
}
