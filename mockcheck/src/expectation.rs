// vim: tw=80
use std::{
    fmt::Debug,
    mem,
    ops::Range,
    sync::{Mutex, MutexGuard, PoisonError}
};

use downcast::*;
use fragile::Fragile;
use predicates::prelude::{Predicate, predicate};
use predicates_tree::CaseTreeExt;

use crate::{ErrorKind, signature, times::Times};

/// Return functions for expectations
enum Rfunc<I, O> {
    Default,
    // Indicates that a `return_once` expectation has already returned
    Expired,
    Mut(Box<dyn FnMut(I) -> O + Send>),
    Once(Box<dyn FnOnce(I) -> O + Send>),
}

impl<I, O> Rfunc<I, O> {
    fn call_mut(&mut self, args: I) -> Result<O, ErrorKind> {
        match self {
            Rfunc::Default => Err(ErrorKind::NoReturnValue),
            Rfunc::Expired => Err(ErrorKind::Exhausted),
            Rfunc::Mut(f) => Ok(f(args)),
            Rfunc::Once(_) => {
                match mem::replace(self, Rfunc::Expired) {
                    Rfunc::Once(f) => Ok(f(args)),
                    _ => unreachable!()
                }
            },
        }
    }
}

impl<I, O> Default for Rfunc<I, O> {
    fn default() -> Self {
        Rfunc::Default
    }
}

struct Matcher<I>(Mutex<Box<dyn Predicate<I> + Send>>);

impl<I> Matcher<I> {
    fn lock(&self) -> MutexGuard<'_, Box<dyn Predicate<I> + Send>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn matches(&self, i: &I) -> bool {
        self.lock().eval(i)
    }

    fn new<P: Predicate<I> + Send + 'static>(p: P) -> Self {
        Matcher(Mutex::new(Box::new(p)))
    }

    /// Describe why `i` fails to match, as a tree of failed sub-predicates.
    fn explain(&self, i: &I) -> Option<String> {
        let guard = self.lock();
        let why = guard.find_case(false, i)
            .map(|case| case.tree().to_string());
        why
    }
}

impl<I: 'static> Default for Matcher<I> {
    fn default() -> Self {
        Matcher::new(predicates::constant::always())
    }
}

/// Type-erased view of an [`Expectation`], so that one mock can hold
/// expectations for methods of different signatures.
#[doc(hidden)]
pub trait AnyExpectation : AnySync {
    /// Name of the expected method
    fn method(&self) -> &str;

    /// How the expectation is rendered in failure messages
    fn signature(&self) -> String;

    /// Describe the call count violation, if there is one.
    fn unsatisfied(&self) -> Option<String>;
}
downcast_sync!(dyn AnyExpectation);

/// A single expected method call on a [`Mock`](crate::Mock).
///
/// `I` is the type of the method's arguments: `()` for none, the argument's
/// own type for one, or a tuple for several.  `O` is the return type.
///
/// By default an `Expectation` accepts any arguments, may be called any number
/// of times, and has no return value.  Calling an expectation with no return
/// value is an error.
pub struct Expectation<I, O> {
    method: String,
    matcher: Matcher<I>,
    params: Option<String>,
    times: Times,
    rfunc: Mutex<Rfunc<I, O>>,
}

impl<I: 'static, O: 'static> Expectation<I, O> {
    pub(crate) fn new(method: &str) -> Self {
        Expectation {
            method: method.to_owned(),
            matcher: Matcher::default(),
            params: None,
            times: Times::default(),
            rfunc: Mutex::new(Rfunc::default()),
        }
    }

    /// Simulate calling the real method for this expectation.  The caller
    /// must already have checked that the arguments match.
    pub(crate) fn call(&self, i: I) -> Result<O, ErrorKind> {
        self.times.call();
        self.rfunc.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .call_mut(i)
    }

    pub(crate) fn explain(&self, i: &I) -> Option<String> {
        self.matcher.explain(i)
    }

    pub(crate) fn is_done(&self) -> bool {
        self.times.is_done()
    }

    pub(crate) fn matches(&self, i: &I) -> bool {
        self.matcher.matches(i)
    }

    /// How many times has this expectation been called so far?
    pub fn call_count(&self) -> usize {
        self.times.count()
    }

    /// Require this expectation to be called at least `n` times.
    pub fn at_least(&mut self, n: usize) -> &mut Self {
        self.times.at_least(n);
        self
    }

    /// Allow this expectation to be called at most `n` times.
    pub fn at_most(&mut self, n: usize) -> &mut Self {
        self.times.at_most(n);
        self
    }

    /// Forbid this expectation from ever being called.
    pub fn never(&mut self) -> &mut Self {
        self.times.never();
        self
    }

    /// Expect this expectation to be called exactly once.  Shortcut for
    /// [`times(1)`](#method.times).
    pub fn once(&mut self) -> &mut Self {
        self.times(1)
    }

    /// Require this expectation to be called exactly `n` times.
    pub fn times(&mut self, n: usize) -> &mut Self {
        self.times.n(n);
        self
    }

    /// Allow this expectation to be called any number of times
    ///
    /// This behavior is the default, but the method is provided in case the
    /// default behavior changes.
    pub fn times_any(&mut self) -> &mut Self {
        self.times.any();
        self
    }

    /// Allow this expectation to be called any number of times within a
    /// given range
    pub fn times_range(&mut self, range: Range<usize>) -> &mut Self {
        self.times.range(range);
        self
    }

    /// Set matching criteria for this Expectation.
    ///
    /// The matching predicate can be anything implementing the
    /// [`Predicate`](trait.Predicate.html) trait.  Only one matcher can be set
    /// per `Expectation` at a time.  Failure messages describe the expectation
    /// using the predicate's `Display` output.
    ///
    /// # Examples
    /// ```
    /// # use mockcheck::*;
    /// let mut mock = Mock::new("calc");
    /// mock.expect::<(u32, u32), u32>("add")
    ///     .with(predicate::function(|(x, y): &(u32, u32)| x < y))
    ///     .return_const(3u32);
    /// assert_eq!(3, mock.call::<_, u32>("add", (1u32, 2u32)).unwrap());
    /// ```
    pub fn with<P>(&mut self, p: P) -> &mut Self
        where P: Predicate<I> + Send + 'static
    {
        self.params = Some(p.to_string());
        self.matcher = Matcher::new(p);
        self
    }

    /// Only match calls whose arguments equal `args`.
    ///
    /// The arguments also become part of this expectation's signature in
    /// failure messages, like `foo(1, "x")`.
    pub fn with_args(&mut self, args: I) -> &mut Self
        where I: Debug + PartialEq + Send
    {
        self.params = Some(signature::params(&args));
        self.matcher = Matcher::new(predicate::eq(args));
        self
    }

    /// Set a matching function for this Expectation.
    ///
    /// This is equivalent to calling [`with`](#method.with) with a function
    /// argument, like `with(predicate::function(f))`.
    pub fn withf<F>(&mut self, f: F) -> &mut Self
        where F: Fn(&I) -> bool + Send + Sync + 'static
    {
        self.with(predicate::function(f))
    }

    /// Return a constant value from the `Expectation`
    ///
    /// The output type must be `Clone`.  The compiler can't always infer the
    /// proper type to use with this method; you will usually need to specify
    /// it explicitly.  i.e. `return_const(42i32)` instead of
    /// `return_const(42)`.
    pub fn return_const<V>(&mut self, c: V) -> &mut Self
        where V: Clone + Into<O> + Send + 'static
    {
        self.returning(move |_| c.clone().into())
    }

    /// Supply an `FnOnce` closure that will provide the return value for this
    /// Expectation.  This is useful for return types that aren't `Clone`.  It
    /// is an error to call this expectation twice; the second call fails with
    /// [`ErrorKind::Exhausted`].
    pub fn return_once<F>(&mut self, f: F) -> &mut Self
        where F: FnOnce(I) -> O + Send + 'static
    {
        self.set_rfunc(Rfunc::Once(Box::new(f)))
    }

    /// Single-threaded version of [`return_once`](#method.return_once).
    ///
    /// This is useful for return types that are neither `Send` nor `Clone`.
    ///
    /// It is a runtime error to call the mock method from a different thread
    /// than the one that originally called this method.
    pub fn return_once_st<F>(&mut self, f: F) -> &mut Self
        where F: FnOnce(I) -> O + 'static
    {
        let fragile = Fragile::new(f);
        self.return_once(move |i| (fragile.into_inner())(i))
    }

    /// Supply a closure that will provide the return value for this
    /// `Expectation`.  The method's arguments are passed to the closure by
    /// value.
    pub fn returning<F>(&mut self, f: F) -> &mut Self
        where F: FnMut(I) -> O + Send + 'static
    {
        self.set_rfunc(Rfunc::Mut(Box::new(f)))
    }

    /// Single-threaded version of [`returning`](#method.returning).
    ///
    /// Can be used when the argument or return type isn't `Send`.
    ///
    /// It is a runtime error to call the mock method from a different thread
    /// than the one that originally called this method.
    pub fn returning_st<F>(&mut self, f: F) -> &mut Self
        where F: FnMut(I) -> O + 'static
    {
        let mut fragile = Fragile::new(f);
        self.returning(move |i| (fragile.get_mut())(i))
    }

    fn set_rfunc(&mut self, rfunc: Rfunc<I, O>) -> &mut Self {
        *self.rfunc.get_mut().unwrap_or_else(PoisonError::into_inner) = rfunc;
        self
    }
}

impl<I: 'static, O: 'static> AnyExpectation for Expectation<I, O> {
    fn method(&self) -> &str {
        &self.method
    }

    fn signature(&self) -> String {
        let params = self.params.as_deref().unwrap_or("any parameters");
        signature::render(&self.method, Some(params))
    }

    fn unsatisfied(&self) -> Option<String> {
        if self.times.is_satisfied() {
            None
        } else {
            Some(signature::count_mismatch(&self.signature(), &self.times,
                                           self.times.count()))
        }
    }
}
