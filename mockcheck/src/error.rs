// vim: tw=80
use std::fmt;

use thiserror::Error;

use crate::backtrace::FilteredBacktrace;

/// What sort of expectation violation occurred.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// A method was called that had no matching expectation.
    UnexpectedInvocation,
    /// An expectation was called outside of its allowed number of times.
    CallCount,
    /// An expectation matched, but was never told what to return.
    NoReturnValue,
    /// A `return_once` expectation was called again after returning.
    Exhausted,
}

/// A violated expectation.
///
/// The message names the mock, the method signature, and the expected and
/// actual call counts.  The attached backtrace points at the test code that
/// triggered the failure, not at mockcheck.  Format with `{:#}` to include it.
#[derive(Debug, Error)]
pub struct ExpectationError {
    kind: ErrorKind,
    message: String,
    trace: FilteredBacktrace,
}

impl ExpectationError {
    pub(crate) fn new(kind: ErrorKind, message: String,
                      trace: FilteredBacktrace) -> Self
    {
        ExpectationError{kind, message, trace}
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> &FilteredBacktrace {
        &self.trace
    }
}

impl fmt::Display for ExpectationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)?;
        if f.alternate() && !self.trace.is_empty() {
            write!(f, "\n{}", self.trace)?;
        }
        Ok(())
    }
}

/// Every violation found by [`verify_all`](crate::verify_all).
#[derive(Debug, Error)]
#[error("{} expectation(s) violated:\n{}", .0.len(), render(.0))]
pub struct Failures(pub Vec<ExpectationError>);

impl Failures {
    pub fn errors(&self) -> &[ExpectationError] {
        &self.0
    }
}

fn render(errors: &[ExpectationError]) -> String {
    errors.iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}
