// vim: tw=80
//! Runtime mock objects that verify how they were called.
//!
//! Mockcheck provides a [`Mock`] type that stands in for a real collaborator
//! in unit tests.  Unlike macro-generated mocks, a `Mock` is an ordinary value:
//! the methods of the mocked trait are implemented by hand and forward to
//! [`Mock::call`].
//!
//! # Usage
//!
//! * Create a [`Mock`] with a name.  The name prefixes every failure message.
//! * Register [`Expectation`]s with [`Mock::expect`].  Each expectation can
//!   have an argument matcher, a required call count, and a return value.
//! * Hand the mock to the code under test.  Calls that match an expectation
//!   return its value; calls that match none return an
//!   [`ExpectationError`] immediately and are remembered.
//! * After the test body, run the verification pass with [`Mock::verify`] or
//!   [`verify_all`].  It fails for every expectation called the wrong number
//!   of times and every call that matched no expectation.
//!
//! ```
//! use mockcheck::*;
//!
//! let mut mock = Mock::new("counter");
//! mock.expect::<u32, u32>("incr")
//!     .with(predicate::lt(10))
//!     .times(2)
//!     .returning(|x| x + 1);
//!
//! assert_eq!(4, mock.call::<u32, u32>("incr", 3).unwrap());
//! assert_eq!(6, mock.call::<u32, u32>("incr", 5).unwrap());
//! mock.verify().unwrap();
//! ```
//!
//! # Unexpected invocations
//!
//! A call that matches no expectation is represented by a
//! [`MissingExpectation`]: an expectation that permits zero calls and has
//! received one.  Its error message lists the mock's expectations for similar
//! methods, as decided by the mock's [`Similarity`] policy, to show what the
//! test did expect.
//!
//! ```
//! use mockcheck::*;
//!
//! let mut mock = Mock::new("db");
//! mock.expect::<i32, ()>("foo").with_args(1).return_const(());
//! mock.expect::<&'static str, ()>("foo").with_args("a").return_const(());
//!
//! let err = mock.call::<i32, ()>("foo", 7).unwrap_err();
//! assert_eq!(ErrorKind::UnexpectedInvocation, err.kind());
//! assert_eq!(
//!     "db.foo(7) - expected calls: 0, actual calls: 1\n\
//!      Similar expectations:\n\
//!      foo(1)\n\
//!      foo(\"a\")",
//!     err.message());
//!
//! // The verification pass reports it again
//! assert!(mock.verify().is_err());
//! ```
//!
//! # Backtraces
//!
//! Every [`ExpectationError`] carries a [`FilteredBacktrace`] from which
//! mockcheck's own frames have been removed, so it begins at the test code.
//! Backtraces are captured only when enabled by `RUST_BACKTRACE` or
//! `RUST_LIB_BACKTRACE`, unless the mock's filter was built with
//! [`BacktraceFilter::force_capture`].  Print them with the alternate format,
//! `{:#}`.

mod backtrace;
mod error;
mod expectation;
mod missing;
mod mock;
mod signature;
mod similarity;
mod times;

pub use crate::backtrace::{BacktraceFilter, FilteredBacktrace, Frame};
pub use crate::error::{ErrorKind, ExpectationError, Failures};
pub use crate::expectation::Expectation;
pub use crate::missing::MissingExpectation;
pub use crate::mock::{Mock, verify_all};
pub use crate::similarity::{EditDistance, SameName, Similarity};
pub use predicates::prelude::{Predicate, predicate};
