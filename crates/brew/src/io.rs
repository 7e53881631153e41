//! Host I/O shim for `print`, `inputi`, `inputs`.
//!
//! The evaluator never touches stdio directly — it writes through a
//! `PrintWriter` and reads through an `InputReader`, exactly as `run.rs`
//! wires it up. This is what lets the integration tests drive programs
//! against canned input and assert on collected output instead of a real
//! terminal.

use std::collections::VecDeque;

use crate::exceptions::{BrewException, RunResult};

/// Sink for `print`. One call per evaluated `print` statement;
/// the evaluator has already joined the arguments and applied the value
/// formatting rules before the line reaches here.
pub trait PrintWriter {
    fn print_line(&mut self, line: &str);
}

/// Writes to the process's standard output.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn print_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Discards everything. Useful when a test only cares about a return value.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn print_line(&mut self, _line: &str) {}
}

/// Collects printed lines in order, for assertions in tests.
#[derive(Debug, Default)]
pub struct CollectStringPrint {
    lines: Vec<String>,
}

impl CollectStringPrint {
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl PrintWriter for CollectStringPrint {
    fn print_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

/// Source for `inputi`/`inputs`. Both builtins read one line of
/// raw input; the only difference between them is how the evaluator parses
/// what comes back.
pub trait InputReader {
    fn read_line(&mut self) -> RunResult<String>;
}

/// Reads a line from the process's standard input.
#[derive(Debug, Default)]
pub struct StdInput;

impl InputReader for StdInput {
    fn read_line(&mut self) -> RunResult<String> {
        let mut buf = String::new();
        std::io::stdin()
            .read_line(&mut buf)
            .map_err(|err| BrewException::name_error(format!("failed to read input: {err}")))?;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(buf)
    }
}

/// Always fails. For tests that assert a program never calls `inputi`/`inputs`.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputReader for NoInput {
    fn read_line(&mut self) -> RunResult<String> {
        Err(BrewException::name_error("no input available"))
    }
}

/// Replays a fixed sequence of lines, one per call. For deterministic tests.
#[derive(Debug, Default)]
pub struct FixedInput {
    lines: VecDeque<String>,
}

impl FixedInput {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputReader for FixedInput {
    fn read_line(&mut self) -> RunResult<String> {
        self.lines
            .pop_front()
            .ok_or_else(|| BrewException::name_error("no more input"))
    }
}
