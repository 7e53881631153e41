//! The two runtime error kinds and the exception value that
//! carries one up through the evaluator.
//!
//! Brew has no in-language `try`/`catch`, so `BrewException` plays the role
//! an `error(kind, msg)` host-shim sink would: raising one unwinds through
//! `?` all the way to the driver in `run.rs`, which is the only place that
//! turns it into a final report.

use std::fmt;
use std::rc::Rc;

/// The only two error kinds the evaluator can raise. Parsing
/// errors are a separate `ParseError` type — they never reach this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ExcType {
    NameError,
    TypeError,
}

/// One call/method/lambda activation active when a `BrewException` was
/// raised. Name-only: this crate has no source spans to report, so a frame
/// carries the active call's name and nothing else.
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub name: Rc<str>,
}

/// An unwinding runtime error. Every fallible evaluator operation
/// returns `RunResult<T> = Result<T, BrewException>`; the driver (`run.rs`)
/// is the only place an `Err` is ever inspected rather than propagated with
/// `?`.
#[derive(Debug, Clone)]
pub struct BrewException {
    kind: ExcType,
    message: String,
    frames: Vec<StackFrame>,
}

impl BrewException {
    pub fn new(kind: ExcType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            frames: Vec::new(),
        }
    }

    pub fn name_error(message: impl Into<String>) -> Self {
        Self::new(ExcType::NameError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ExcType::TypeError, message)
    }

    #[must_use]
    pub fn kind(&self) -> ExcType {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Records the name of the activation this error is currently unwinding
    /// through. Called on the way out of `call.rs`'s function/lambda/method
    /// invocation so the final report reads like a (name-only) traceback.
    pub(crate) fn push_frame(mut self, name: Rc<str>) -> Self {
        self.frames.push(StackFrame { name });
        self
    }
}

impl fmt::Display for BrewException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for frame in &self.frames {
            write!(f, "\n  in {}", frame.name)?;
        }
        Ok(())
    }
}

impl std::error::Error for BrewException {}

/// Shorthand used throughout the evaluator for a fallible operation.
pub type RunResult<T> = Result<T, BrewException>;
