// vim: tw=80
use std::{
    fmt::{self, Debug, Display},
    sync::{Arc, Mutex, MutexGuard, PoisonError}
};

use tracing::{debug, trace};

use crate::{
    BacktraceFilter,
    ErrorKind,
    ExpectationError,
    Failures,
    MissingExpectation,
    expectation::{AnyExpectation, Expectation},
    signature,
    similarity::{SameName, Similarity}
};

/// A call that matched no expectation
#[derive(Clone, Debug)]
struct Invocation {
    method: String,
    params: String,
}

#[derive(Default)]
struct State {
    expectations: Vec<Arc<dyn AnyExpectation>>,
    unexpected: Vec<Invocation>,
}

/// A test double that dispatches method calls to registered
/// [`Expectation`]s.
///
/// A mock is normally wrapped by a hand-written implementation of the trait
/// being mocked, whose methods forward to [`Mock::call`].  After the code
/// under test has run, [`Mock::verify`] reports every expectation that was
/// called the wrong number of times and every call that matched no
/// expectation at all.
///
/// # Examples
/// ```
/// # use mockcheck::*;
/// trait Store {
///     fn get(&self, key: u32) -> Option<String>;
/// }
///
/// struct MockStore(Mock);
///
/// impl Store for MockStore {
///     fn get(&self, key: u32) -> Option<String> {
///         self.0.call("get", key).ok().flatten()
///     }
/// }
///
/// let mut mock = Mock::new("store");
/// mock.expect::<u32, Option<String>>("get")
///     .with_args(1)
///     .once()
///     .returning(|_| Some("one".to_owned()));
/// let store = MockStore(mock);
///
/// assert_eq!(Some("one".to_owned()), store.get(1));
/// assert_eq!(None, store.get(2));
///
/// let err = store.0.verify().unwrap_err();
/// assert_eq!(ErrorKind::UnexpectedInvocation, err.kind());
/// assert_eq!(
///     "store.get(2) - expected calls: 0, actual calls: 1\n\
///      Similar expectations:\n\
///      get(1)",
///     err.message());
/// ```
pub struct Mock {
    name: String,
    similarity: Box<dyn Similarity>,
    filter: BacktraceFilter,
    state: Mutex<State>,
}

impl Mock {
    pub fn new(name: impl Into<String>) -> Self {
        Mock {
            name: name.into(),
            similarity: Box::new(SameName),
            filter: BacktraceFilter::default(),
            state: Mutex::default(),
        }
    }

    /// Use `policy` to choose which expectations are listed as similar when a
    /// call matches none of them.
    pub fn with_similarity<S>(mut self, policy: S) -> Self
        where S: Similarity + 'static
    {
        self.similarity = Box::new(policy);
        self
    }

    /// Use `filter` to strip frames from the backtraces of this mock's errors.
    pub fn with_backtrace_filter(mut self, filter: BacktraceFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a new expectation for `method`.
    ///
    /// When several expectations could match a call, the most recently created
    /// one that may still be called wins.
    pub fn expect<I, O>(&mut self, method: &str) -> &mut Expectation<I, O>
        where I: 'static, O: 'static
    {
        let state = self.state.get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        state.expectations.push(Arc::new(Expectation::<I, O>::new(method)));
        // Calls only hold clones for their own duration, and those can't
        // overlap with &mut self.
        state.expectations.last_mut()
            .and_then(Arc::get_mut)
            .and_then(|e| e.downcast_mut().ok())
            .expect("an expectation was just registered")
    }

    /// Create an expectation for `method` that may be called any number of
    /// times, including none.
    pub fn stub<I, O>(&mut self, method: &str) -> &mut Expectation<I, O>
        where I: 'static, O: 'static
    {
        self.expect(method).times_any()
    }

    /// Simulate calling `method` with `args`.
    ///
    /// Only expectations for `method` whose argument and return types are `I`
    /// and `O` and whose matcher accepts `args` are considered.  If none is
    /// found the invocation is recorded, so that [`verify`](#method.verify)
    /// will report it too, and a
    /// [`MissingExpectation`](crate::MissingExpectation) error is returned.
    ///
    /// The mock is not locked while the expectation's return function runs,
    /// so the function may call other expectations of the same mock.
    pub fn call<I, O>(&self, method: &str, args: I)
        -> Result<O, ExpectationError>
        where I: Debug + 'static, O: 'static
    {
        let params = {
            let mut guard = self.lock();
            let State{expectations, unexpected} = &mut *guard;
            if let Some(e) = self.find::<I, O>(expectations, method, &args) {
                drop(guard);
                return self.dispatch(&e, args);
            }
            let params = signature::params(&args);
            debug!(mock = %self.name, method, params = %params,
                   "no matching expectation");
            unexpected.push(Invocation {
                method: method.to_owned(),
                params: params.clone()
            });
            params
        };
        let missing = MissingExpectation::new(self, method).with_params(params);
        Err(missing.violation())
    }

    fn find<I, O>(&self, expectations: &[Arc<dyn AnyExpectation>],
                  method: &str, args: &I)
        -> Option<Arc<Expectation<I, O>>>
        where I: 'static, O: 'static
    {
        let mut exhausted = None;
        let candidates = expectations.iter()
            .rev()
            .filter(|e| e.method() == method)
            .filter_map(|e| {
                Arc::clone(e).downcast_arc::<Expectation<I, O>>().ok()
            });
        for e in candidates {
            if !e.matches(args) {
                if let Some(why) = e.explain(args) {
                    trace!(mock = %self.name, "{} did not match:\n{}",
                           e.signature(), why);
                }
                continue;
            }
            if !e.is_done() {
                return Some(e);
            }
            exhausted.get_or_insert(e);
        }
        // Calling an expectation too often is reported during verification
        exhausted
    }

    fn dispatch<I, O>(&self, e: &Expectation<I, O>, args: I)
        -> Result<O, ExpectationError>
        where I: 'static, O: 'static
    {
        debug!(mock = %self.name, "called {}", e.signature());
        e.call(args).map_err(|kind| {
            let problem = match kind {
                ErrorKind::Exhausted => "return_once value already returned",
                _ => "no return value configured",
            };
            let msg = format!("{}.{} - {}", self.name, e.signature(), problem);
            self.error(kind, msg)
        })
    }

    /// Signatures of every expectation whose method resembles `method`, in the
    /// order they were registered.  Resemblance is decided by this mock's
    /// [`Similarity`] policy.
    pub fn find_similar(&self, method: &str) -> Vec<String> {
        self.lock().expectations.iter()
            .filter(|e| self.similarity.is_similar(e.method(), method))
            .map(|e| e.signature())
            .collect()
    }

    pub(crate) fn error(&self, kind: ErrorKind, message: String)
        -> ExpectationError
    {
        ExpectationError::new(kind, message, self.filter.capture())
    }

    /// Every violation this mock has seen so far.
    ///
    /// Unexpected invocations come first, in the order they happened, followed
    /// by expectations with unsatisfied call counts, in the order they were
    /// registered.
    pub fn violations(&self) -> Vec<ExpectationError> {
        let (unexpected, unsatisfied) = {
            let state = self.lock();
            let unsatisfied = state.expectations.iter()
                .filter_map(|e| e.unsatisfied())
                .collect::<Vec<_>>();
            (state.unexpected.clone(), unsatisfied)
        };
        let mut errors = unexpected.into_iter()
            .map(|inv| MissingExpectation::new(self, &inv.method)
                .with_params(inv.params)
                .violation())
            .collect::<Vec<_>>();
        errors.extend(unsatisfied.into_iter().map(|desc| {
            self.error(ErrorKind::CallCount, format!("{}.{}", self.name, desc))
        }));
        errors
    }

    /// Report the first violation, if any.
    pub fn verify(&self) -> Result<(), ExpectationError> {
        match self.violations().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(())
        }
    }

    /// Verify this mock, then forget all of its expectations and recorded
    /// invocations, whether or not verification passed.
    pub fn checkpoint(&mut self) -> Result<(), ExpectationError> {
        let r = self.verify();
        let state = self.state.get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        *state = State::default();
        r
    }
}

impl Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Mock")
            .field("name", &self.name)
            .field("expectations", &state.expectations.len())
            .field("unexpected", &state.unexpected)
            .finish_non_exhaustive()
    }
}

impl Display for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The verification pass: verify every mock, collecting all violations.
pub fn verify_all<'a, M>(mocks: M) -> Result<(), Failures>
    where M: IntoIterator<Item=&'a Mock>
{
    let errors = mocks.into_iter()
        .flat_map(Mock::violations)
        .collect::<Vec<_>>();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Failures(errors))
    }
}
