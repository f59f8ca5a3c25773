use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bee::bytecode::disassemble;
use bee::vm::STACK_MAX;
use bee::{RuntimeConfig, RuntimeError};
use clap::Parser;
use tracing::debug;

use crate::codegen::compile;
use crate::lexer::Scanner;
use crate::runtime::{report, InterpretResult, Interpreter};

/// bee - compile and run single arithmetic expressions
#[derive(Parser, Debug)]
#[command(name = "bee", version)]
#[command(about = "Compile and run bee expressions", long_about = None)]
pub struct Cli {
    /// Script to run (starts a REPL if omitted)
    pub script: Option<PathBuf>,

    /// Print the scanner's tokens instead of running
    #[arg(long)]
    pub tokens: bool,

    /// Print tokens as JSON lines
    #[arg(long, requires = "tokens")]
    pub json: bool,

    /// Print the compiled bytecode before running it
    #[arg(long)]
    pub disassemble: bool,

    /// Trace every instruction (shown at trace log level)
    #[arg(long)]
    pub trace: bool,

    /// Capacity of the value stack
    #[arg(long, value_name = "N", default_value_t = STACK_MAX)]
    pub stack_max: usize,
}

impl Cli {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig::new()
            .with_stack_trace(self.trace)
            .with_stack_max(self.stack_max)
    }
}

/// Process exit statuses, following the BSD sysexits convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Usage,
    DataError,
    Software,
    IoError,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Usage => 64,
            ExitStatus::DataError => 65,
            ExitStatus::Software => 70,
            ExitStatus::IoError => 74,
        }
    }
}

impl From<InterpretResult> for ExitStatus {
    fn from(result: InterpretResult) -> Self {
        match result {
            InterpretResult::Ok => ExitStatus::Success,
            InterpretResult::CompileError => ExitStatus::DataError,
            InterpretResult::RuntimeError => ExitStatus::Software,
        }
    }
}

pub struct CliHandler {
    interpreter: Interpreter,
    tokens: bool,
    json: bool,
    disassemble: bool,
}

impl CliHandler {
    pub fn new(cli: &Cli) -> Result<Self, RuntimeError> {
        Ok(Self {
            interpreter: Interpreter::with_config(cli.runtime_config())?,
            tokens: cli.tokens,
            json: cli.json,
            disassemble: cli.disassemble,
        })
    }

    /// Run the script named on the command line, or a REPL on stdin
    pub fn handle(&self, cli: &Cli) -> Result<ExitStatus> {
        let stdout = io::stdout();
        let stderr = io::stderr();

        match &cli.script {
            Some(path) => self.run_file(path, &mut stdout.lock(), &mut stderr.lock()),
            None => self.repl(io::stdin().lock(), &mut stdout.lock(), &mut stderr.lock()),
        }
    }

    pub fn run_file<W: Write, E: Write>(
        &self,
        path: &Path,
        out: &mut W,
        err: &mut E,
    ) -> Result<ExitStatus> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                debug!(%error, path = %path.display(), "failed to read script");
                writeln!(err, "Could not open file \"{}\".", path.display())?;
                return Ok(ExitStatus::IoError);
            }
        };

        self.run_source(&source, out, err)
    }

    /// Read-eval-print loop; errors are reported and the session goes on
    pub fn repl<R: BufRead, W: Write, E: Write>(
        &self,
        mut input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<ExitStatus> {
        let mut line = String::new();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            line.clear();
            let read = input
                .read_line(&mut line)
                .context("Failed to read from stdin")?;
            if read == 0 {
                writeln!(out)?;
                return Ok(ExitStatus::Success);
            }

            self.run_source(&line, out, err)?;
        }
    }

    pub fn run_source<W: Write, E: Write>(
        &self,
        source: &str,
        out: &mut W,
        err: &mut E,
    ) -> Result<ExitStatus> {
        if self.tokens {
            self.dump_tokens(source, out)?;
            return Ok(ExitStatus::Success);
        }

        if !self.disassemble {
            return Ok(self.interpreter.interpret_with(source, out, err).into());
        }

        let outcome = match compile(source) {
            Ok(bytecode) => {
                write!(out, "{}", disassemble(&bytecode, "code"))?;
                self.interpreter.execute(&bytecode)
            }
            Err(failure) => Err(failure.into()),
        };
        Ok(report(outcome, out, err).into())
    }

    fn dump_tokens<W: Write>(&self, source: &str, out: &mut W) -> Result<()> {
        let mut last_line = None;
        for token in Scanner::new(source) {
            if self.json {
                serde_json::to_writer(&mut *out, &token).context("Failed to encode token")?;
                writeln!(out)?;
                continue;
            }

            if last_line == Some(token.line) {
                write!(out, "   | ")?;
            } else {
                write!(out, "{:4} ", token.line)?;
                last_line = Some(token.line);
            }
            writeln!(out, "{:<12} '{}'", token.kind, token.text())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn create_test_cli(args: &[&str]) -> Cli {
        let argv = std::iter::once("bee").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    fn create_test_handler(args: &[&str]) -> CliHandler {
        CliHandler::new(&create_test_cli(args)).unwrap()
    }

    fn create_test_script(source: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", source).unwrap();
        file
    }

    fn run_script(handler: &CliHandler, source: &str) -> (ExitStatus, String, String) {
        let script = create_test_script(source);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = handler.run_file(script.path(), &mut out, &mut err).unwrap();
        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_parse_arguments() {
        let cli = create_test_cli(&["--trace", "--stack-max", "32", "script.bee"]);
        assert_eq!(cli.script, Some(PathBuf::from("script.bee")));
        assert!(cli.trace);
        assert!(!cli.tokens);

        let config = cli.runtime_config();
        assert!(config.stack_trace);
        assert!(!config.debug_mode);
        assert_eq!(config.stack_max, 32);
    }

    #[test]
    fn test_default_arguments() {
        let cli = create_test_cli(&[]);
        assert_eq!(cli.script, None);
        assert_eq!(cli.runtime_config(), RuntimeConfig::default());
    }

    #[test]
    fn test_json_requires_tokens() {
        assert!(Cli::try_parse_from(["bee", "--json"]).is_err());
        assert!(Cli::try_parse_from(["bee", "--tokens", "--json"]).is_ok());
    }

    #[test]
    fn test_zero_stack_is_rejected() {
        let cli = create_test_cli(&["--stack-max", "0"]);
        assert!(matches!(CliHandler::new(&cli), Err(RuntimeError::ConfigError(_))));
    }

    #[test]
    fn test_exit_status_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Usage.code(), 64);
        assert_eq!(ExitStatus::from(InterpretResult::CompileError).code(), 65);
        assert_eq!(ExitStatus::from(InterpretResult::RuntimeError).code(), 70);
        assert_eq!(ExitStatus::IoError.code(), 74);
    }

    #[test]
    fn test_run_file() {
        let handler = create_test_handler(&[]);
        let (status, out, err) = run_script(&handler, "// sum\n1 + 2 * 3\n");
        assert_eq!(status, ExitStatus::Success);
        assert_eq!(out, "7\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_file_errors() {
        let handler = create_test_handler(&[]);

        let (status, out, err) = run_script(&handler, "(1 + 2");
        assert_eq!(status, ExitStatus::DataError);
        assert!(out.is_empty());
        assert_eq!(err, "[line 1] Error at end: Expect ')' after expression.\n");

        let (status, _, err) = run_script(&handler, "1 +\ntrue");
        assert_eq!(status, ExitStatus::Software);
        assert_eq!(err, "Operands must be numbers.\n[line 2] in script\n");
    }

    #[test]
    fn test_missing_file() {
        let handler = create_test_handler(&[]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bee");

        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = handler.run_file(&path, &mut out, &mut err).unwrap();

        assert_eq!(status, ExitStatus::IoError);
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("Could not open file"));
    }

    #[test]
    fn test_repl_keeps_going_after_errors() {
        let handler = create_test_handler(&[]);
        let input = Cursor::new("1 + 1\n-nil\n)\n2 * 3\n");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let status = handler.repl(input, &mut out, &mut err).unwrap();

        assert_eq!(status, ExitStatus::Success);
        assert_eq!(String::from_utf8(out).unwrap(), "> 2\n> > > 6\n> \n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Operand must be a number.\n[line 1] in script\n\
             [line 1] Error at ')': Expect expression.\n"
        );
    }

    #[test]
    fn test_disassemble_prints_listing_then_value() {
        let handler = create_test_handler(&["--disassemble"]);
        let (status, out, _) = run_script(&handler, "-1");
        assert_eq!(status, ExitStatus::Success);
        assert_eq!(
            out,
            "== code ==\n\
             0000    1 OP_CONSTANT         0 '1'\n\
             0002    | OP_NEGATE\n\
             0003    | OP_RETURN\n\
             -1\n"
        );
    }

    #[test]
    fn test_disassemble_is_not_debug_mode() {
        let cli = create_test_cli(&["--disassemble"]);
        assert!(!cli.runtime_config().debug_mode);
    }

    #[test]
    fn test_disassemble_skips_listing_on_compile_error() {
        let handler = create_test_handler(&["--disassemble"]);
        let (status, out, err) = run_script(&handler, "1 +");
        assert_eq!(status, ExitStatus::DataError);
        assert!(out.is_empty());
        assert_eq!(err, "[line 1] Error at end: Expect expression.\n");
    }

    #[test]
    fn test_disassemble_then_runtime_error() {
        let handler = create_test_handler(&["--disassemble"]);
        let (status, out, err) = run_script(&handler, "-nil");
        assert_eq!(status, ExitStatus::Software);
        assert!(out.starts_with("== code ==\n"));
        assert_eq!(out.matches("== code ==").count(), 1);
        assert_eq!(err, "Operand must be a number.\n[line 1] in script\n");
    }

    #[test]
    fn test_token_table() {
        let handler = create_test_handler(&["--tokens"]);
        let (status, out, _) = run_script(&handler, "1 +\n(");
        assert_eq!(status, ExitStatus::Success);
        assert_eq!(
            out,
            "   1 Number       '1'\n\
             \x20  | Plus         '+'\n\
             \x20  2 LeftParen    '('\n\
             \x20  | Eof          ''\n"
        );
    }

    #[test]
    fn test_token_json_lines() {
        let handler = create_test_handler(&["--tokens", "--json"]);
        let (_, out, _) = run_script(&handler, "nil @");
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["kind"], "Nil");
        assert_eq!(lines[1]["kind"], "Error");
        assert_eq!(lines[1]["lexeme"], "Unexpected character.");
        assert_eq!(lines[2]["kind"], "Eof");
    }
}
