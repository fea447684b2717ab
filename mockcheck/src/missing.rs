// vim: tw=80
use crate::{ErrorKind, ExpectationError, Mock, signature};

/// The absence of any expectation matching a call.
///
/// A `MissingExpectation` is what a [`Mock`] creates when one of its methods
/// is called and no registered [`Expectation`](crate::Expectation) accepts
/// the call.  It behaves like an expectation that allows zero calls but has
/// been called once, so it is violated from the moment it exists:
/// [`verify`](#method.verify) never succeeds.
///
/// # Examples
/// ```
/// # use mockcheck::*;
/// let mut mock = Mock::new("db");
/// mock.expect::<i32, ()>("foo").with_args(1).return_const(());
/// mock.expect::<&'static str, ()>("foo").with_args("a").return_const(());
///
/// let missing = MissingExpectation::new(&mock, "foo").with_params("2.5");
/// let err = missing.verify().unwrap_err();
/// assert_eq!(
///     "db.foo(2.5) - expected calls: 0, actual calls: 1\n\
///      Similar expectations:\n\
///      foo(1)\n\
///      foo(\"a\")",
///     err.message());
/// ```
#[derive(Debug)]
pub struct MissingExpectation<'mock> {
    mock: &'mock Mock,
    method: String,
    params: Option<String>,
}

impl<'mock> MissingExpectation<'mock> {
    pub fn new(mock: &'mock Mock, method: &str) -> Self {
        MissingExpectation {
            mock,
            method: method.to_owned(),
            params: None,
        }
    }

    /// Record the rendered arguments of the unexpected call, as they should
    /// appear between the method's parentheses.
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn mock(&self) -> &'mock Mock {
        self.mock
    }

    pub fn signature(&self) -> String {
        signature::render(&self.method, self.params.as_deref())
    }

    /// Signatures of the mock's expectations that resemble this method.
    pub fn similar_expectations(&self) -> Vec<String> {
        self.mock.find_similar(&self.method)
    }

    /// Always fails with an [`ErrorKind::UnexpectedInvocation`] error whose
    /// message lists any similar expectations.
    pub fn verify(&self) -> Result<(), ExpectationError> {
        Err(self.violation())
    }

    pub(crate) fn violation(&self) -> ExpectationError {
        let mut msg = format!("{}.{}", self.mock.name(),
            signature::count_mismatch(&self.signature(), 0, 1));
        let similar = self.similar_expectations();
        if !similar.is_empty() {
            msg.push_str("\nSimilar expectations:\n");
            msg.push_str(&similar.join("\n"));
        }
        self.mock.error(ErrorKind::UnexpectedInvocation, msg)
    }
}
