//! The driver: parses source, loads function definitions, and runs `main`.

use std::fmt;

use crate::ast::Program;
use crate::call::{invoke_function, CallContext};
use crate::environment::Environment;
use crate::exceptions::BrewException;
use crate::function::FunctionTable;
use crate::heap::Heap;
use crate::io::{InputReader, PrintWriter};
use crate::lexer::ParseError;
use crate::parser;
use crate::value::Value;

/// Holds every piece of mutable state one run threads through the
/// evaluator: the heap, the function table, the shared binding stack, and
/// the host I/O shim.
pub(crate) struct Interpreter<'io> {
    pub heap: Heap,
    pub functions: FunctionTable,
    pub env: Environment,
    pub print: &'io mut dyn PrintWriter,
    pub input: &'io mut dyn InputReader,
}

/// Either stage of running a program can fail, with different error shapes:
/// a parse error has no runtime call stack to report, and a runtime error
/// has no source position.
#[derive(Debug)]
pub enum RunError {
    Parse(ParseError),
    Runtime(BrewException),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Parse(err) => write!(f, "{err}"),
            RunError::Runtime(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<ParseError> for RunError {
    fn from(err: ParseError) -> Self {
        RunError::Parse(err)
    }
}

impl From<BrewException> for RunError {
    fn from(err: BrewException) -> Self {
        RunError::Runtime(err)
    }
}

/// Parses `source` and runs its `main()`, writing through `print` and
/// reading through `input`. Returns `main`'s return value (`nil` if it falls
/// off the end without a `return`).
pub fn run(source: &str, print: &mut dyn PrintWriter, input: &mut dyn InputReader) -> Result<Value, RunError> {
    let program: Program = parser::parse(source)?;
    run_program(program, print, input)
}

fn run_program(program: Program, print: &mut dyn PrintWriter, input: &mut dyn InputReader) -> Result<Value, RunError> {
    let mut functions = FunctionTable::new();
    for def in program.functions {
        functions.register(def);
    }
    let main_id = functions.main()?;

    let mut interp = Interpreter {
        heap: Heap::new(),
        functions,
        env: Environment::new(),
        print,
        input,
    };

    invoke_function(&mut interp, main_id, &[], None, CallContext::Direct).map_err(RunError::from)
}
