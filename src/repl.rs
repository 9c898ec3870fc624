//! Read-eval-print loop
//!
//! Every line is a complete program run against one long-lived [`Evaluator`],
//! so `let` bindings persist across lines. A failing line reports its error
//! and leaves the session as it was before the line.

use std::io::{self, BufRead, Write};

use crate::parser::{parse_source, AstPrinter};
use crate::runtime::Evaluator;

/// Settings for a [`Repl`] session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Printed before reading each line
    pub prompt: String,
    /// Print the AST of every line before its value
    pub echo_ast: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: ">> ".to_string(),
            echo_ast: false,
        }
    }
}

/// Interactive session over any line source and sink
pub struct Repl<R, W> {
    input: R,
    output: W,
    config: ReplConfig,
    evaluator: Evaluator,
}

/// What to do after handling a line
enum Control {
    Continue,
    Quit,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Creates a session with the default configuration
    pub fn new(input: R, output: W) -> Self {
        Self::with_config(input, output, ReplConfig::default())
    }

    /// Creates a session with a custom configuration
    pub fn with_config(input: R, output: W, config: ReplConfig) -> Self {
        Repl {
            input,
            output,
            config,
            evaluator: Evaluator::new(),
        }
    }

    /// Runs until end of input or `:quit`
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", self.config.prompt)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }

            if let Control::Quit = self.handle_line(line.trim())? {
                return Ok(());
            }
        }
    }

    /// Handles one trimmed line of input
    fn handle_line(&mut self, line: &str) -> io::Result<Control> {
        match line {
            "" => {}
            ":quit" | ":exit" => return Ok(Control::Quit),
            ":reset" => {
                self.evaluator.reset();
                writeln!(self.output, "environment cleared")?;
            }
            ":help" => self.print_help()?,
            ":ast" => writeln!(self.output, "Usage: :ast <src>")?,
            _ if line.starts_with(":ast ") => self.print_ast(&line[":ast ".len()..])?,
            _ => self.evaluate(line)?,
        }
        Ok(Control::Continue)
    }

    fn evaluate(&mut self, source: &str) -> io::Result<()> {
        let program = match parse_source(source) {
            Ok(program) => program,
            Err(err) => return writeln!(self.output, "Error: {}", err),
        };

        if self.config.echo_ast {
            writeln!(self.output, "{}", AstPrinter::print(&program))?;
        }

        match self.evaluator.execute(&program) {
            Ok(value) => writeln!(self.output, "{}", value),
            Err(err) => writeln!(self.output, "Error: {}", err),
        }
    }

    fn print_ast(&mut self, source: &str) -> io::Result<()> {
        match parse_source(source) {
            Ok(program) => writeln!(self.output, "{}", AstPrinter::print(&program)),
            Err(err) => writeln!(self.output, "Error: {}", err),
        }
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "Commands:")?;
        writeln!(self.output, "  :quit, :exit  Exit the REPL")?;
        writeln!(self.output, "  :reset        Discard all bindings")?;
        writeln!(self.output, "  :ast <src>    Print the syntax tree of <src>")?;
        writeln!(self.output, "  :help         Show this help")
    }

    /// Consumes the session, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }
}
