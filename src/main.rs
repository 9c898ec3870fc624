use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use monkey::{interpret, parse_source, tokenize, AstPrinter, Repl};

const USAGE: &str = "Usage: monkey [--ast | --tokens] [FILE]

With no arguments, starts an interactive session.

Options:
  --ast <FILE>     Print the syntax tree of FILE
  --tokens <FILE>  Print the tokens of FILE as JSON";

/// Install a fmt subscriber, only when RUST_LOG is set
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn read_source(path: &str) -> Result<String> {
    std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read source file {}", path))
}

fn run_repl() -> Result<()> {
    println!("Monkey {} (type :help for commands)", monkey::VERSION);
    let stdin = io::stdin();
    let mut repl = Repl::new(stdin.lock(), io::stdout());
    repl.run().context("REPL I/O failed")
}

fn run_file(path: &str) -> Result<ExitCode> {
    let source = read_source(path)?;
    match interpret(&source) {
        Ok(value) => {
            println!("{}", value);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_ast(path: &str) -> Result<ExitCode> {
    let source = read_source(path)?;
    match parse_source(&source) {
        Ok(program) => {
            println!("{}", AstPrinter::print(&program));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_tokens(path: &str) -> Result<ExitCode> {
    let source = read_source(path)?;
    let tokens = tokenize(&source);
    let json = serde_json::to_string_pretty(&tokens).context("failed to serialize tokens")?;
    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => run_repl().map(|()| ExitCode::SUCCESS),
        [flag, path] if flag == "--ast" => print_ast(path),
        [flag, path] if flag == "--tokens" => print_tokens(path),
        [path] if !path.starts_with('-') => run_file(path),
        _ => {
            eprintln!("{}", USAGE);
            Ok(ExitCode::from(2))
        }
    }
}
