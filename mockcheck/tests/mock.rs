// vim: tw=80
//! A hand-written trait mock driven by a `Mock`, and the verification pass.

use std::sync::{Arc, OnceLock, Weak};

use mockcheck::*;
use pretty_assertions::assert_eq;

trait Foo {
    fn foo(&self, x: u32) -> u32;
    fn bar(&self, x: u32, y: &str);
}

struct MockFoo(Mock);

impl Foo for MockFoo {
    fn foo(&self, x: u32) -> u32 {
        self.0.call("foo", x).unwrap_or_default()
    }

    fn bar(&self, x: u32, y: &str) {
        let _ = self.0.call::<_, ()>("bar", (x, y.to_owned()));
    }
}

mod checkpoint {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expect_again() {
        let mut mock = Mock::new("m");
        mock.expect::<u32, u32>("foo")
            .returning(|_| 5)
            .times_range(1..3);
        assert_eq!(5, mock.call::<u32, u32>("foo", 0).unwrap());
        mock.checkpoint().unwrap();

        mock.expect::<u32, u32>("foo")
            .returning(|_| 25);
        assert_eq!(25, mock.call::<u32, u32>("foo", 0).unwrap());
    }

    #[test]
    fn not_yet_satisfied() {
        let mut mock = Mock::new("m");
        mock.expect::<u32, u32>("foo")
            .returning(|_| 42)
            .times(1);
        let err = mock.checkpoint().unwrap_err();
        assert_eq!(ErrorKind::CallCount, err.kind());
        assert_eq!("m.foo(any parameters) - expected calls: 1, actual calls: 0",
                   err.message());
        // Expectations were cleared anyway
        mock.verify().unwrap();
    }

    #[test]
    fn removes_old_expectations() {
        let mut mock = Mock::new("m");
        mock.expect::<u32, u32>("foo")
            .returning(|_| 42)
            .times_range(1..3);
        mock.call::<u32, u32>("foo", 0).unwrap();
        mock.checkpoint().unwrap();
        let err = mock.call::<u32, u32>("foo", 0).unwrap_err();
        assert_eq!(ErrorKind::UnexpectedInvocation, err.kind());
    }
}

#[test]
fn trait_mock() {
    let mut mock = Mock::new("MockFoo");
    mock.expect::<u32, u32>("foo")
        .with(predicate::eq(4))
        .once()
        .returning(|x| x + 1);
    mock.expect::<(u32, String), ()>("bar")
        .with_args((1, "one".to_owned()))
        .return_const(());
    let m = MockFoo(mock);
    assert_eq!(5, m.foo(4));
    m.bar(1, "one");
    m.0.verify().unwrap();
}

#[test]
fn unexpected_call_is_reported_by_verification() {
    let mut mock = Mock::new("MockFoo");
    mock.expect::<(u32, String), ()>("bar")
        .with_args((1, "one".to_owned()))
        .return_const(());
    let m = MockFoo(mock);
    m.bar(2, "two");
    let errors = m.0.violations();
    assert_eq!(1, errors.len());
    assert_eq!("MockFoo.bar(2, \"two\") - expected calls: 0, actual calls: 1\n\
                Similar expectations:\n\
                bar(1, \"one\")",
               errors[0].message());
}

#[test]
fn unexpected_calls_come_first() {
    let mut mock = Mock::new("m");
    mock.expect::<u32, u32>("foo").return_const(0u32).times(2);
    mock.call::<u32, u32>("foo", 1).unwrap();
    mock.call::<u32, ()>("bar", 1).unwrap_err();
    let kinds = mock.violations()
        .iter()
        .map(ExpectationError::kind)
        .collect::<Vec<_>>();
    assert_eq!(vec![ErrorKind::UnexpectedInvocation, ErrorKind::CallCount],
               kinds);
}

#[test]
fn never_called() {
    let mut mock = Mock::new("m");
    mock.expect::<(), ()>("foo").return_const(()).never();
    mock.verify().unwrap();
    mock.call::<(), ()>("foo", ()).unwrap();
    assert_eq!("m.foo(any parameters) - expected calls: 0, actual calls: 1",
               mock.verify().unwrap_err().message());
}

#[test]
fn called_too_often() {
    let mut mock = Mock::new("m");
    mock.expect::<(), ()>("foo").return_const(()).at_most(1);
    mock.call::<(), ()>("foo", ()).unwrap();
    mock.call::<(), ()>("foo", ()).unwrap();
    assert_eq!(
        "m.foo(any parameters) - expected calls: at most 1, actual calls: 2",
        mock.verify().unwrap_err().message());
}

#[test]
fn called_too_rarely() {
    let mut mock = Mock::new("m");
    mock.expect::<(), ()>("foo").return_const(()).at_least(2);
    mock.call::<(), ()>("foo", ()).unwrap();
    assert_eq!(
        "m.foo(any parameters) - expected calls: at least 2, actual calls: 1",
        mock.verify().unwrap_err().message());
}

#[test]
fn no_return_value() {
    let mut mock = Mock::new("m");
    mock.expect::<u32, u32>("foo").with_args(3);
    let err = mock.call::<u32, u32>("foo", 3).unwrap_err();
    assert_eq!(ErrorKind::NoReturnValue, err.kind());
    assert_eq!("m.foo(3) - no return value configured", err.message());
}

#[test]
fn return_once_exhausted() {
    let mut mock = Mock::new("m");
    mock.expect::<(), String>("foo").return_once(|_| "x".to_owned());
    assert_eq!("x", mock.call::<(), String>("foo", ()).unwrap());
    let err = mock.call::<(), String>("foo", ()).unwrap_err();
    assert_eq!(ErrorKind::Exhausted, err.kind());
}

#[test]
fn stub_needs_no_calls() {
    let mut mock = Mock::new("m");
    mock.stub::<(), u32>("foo").return_const(1u32);
    mock.verify().unwrap();
}

#[test]
fn shared_between_threads() {
    let mut mock = Mock::new("m");
    mock.expect::<u32, u32>("foo").returning(|x| x * 2).times(4);
    std::thread::scope(|s| {
        for i in 0..4u32 {
            let mock = &mock;
            s.spawn(move || assert_eq!(i * 2, mock.call("foo", i).unwrap()));
        }
    });
    mock.verify().unwrap();
}

#[test]
fn return_function_may_call_the_same_mock() {
    let slot = Arc::new(OnceLock::<Weak<Mock>>::new());
    let mut mock = Mock::new("m");
    mock.expect::<u32, u32>("double").returning(|x| x * 2).times(2);
    let inner = Arc::clone(&slot);
    mock.expect::<u32, u32>("quadruple").returning(move |x| {
        let mock = inner.get().and_then(Weak::upgrade).unwrap();
        let twice = mock.call::<u32, u32>("double", x).unwrap();
        mock.call("double", twice).unwrap()
    });
    let mock = Arc::new(mock);
    slot.set(Arc::downgrade(&mock)).unwrap();
    assert_eq!(12, mock.call::<u32, u32>("quadruple", 3).unwrap());
    mock.verify().unwrap();
}

mod verify_all {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok() {
        let mut a = Mock::new("a");
        a.stub::<(), ()>("foo").return_const(());
        let b = Mock::new("b");
        verify_all([&a, &b]).unwrap();
    }

    #[test]
    fn collects_every_failure() {
        let mut a = Mock::new("a");
        a.expect::<(), ()>("foo").return_const(()).once();
        let b = Mock::new("b");
        b.call::<u32, ()>("bar", 9).unwrap_err();
        let failures = verify_all([&a, &b]).unwrap_err();
        assert_eq!(2, failures.errors().len());
        assert_eq!(
            "2 expectation(s) violated:\n\
             a.foo(any parameters) - expected calls: 1, actual calls: 0\n\n\
             b.bar(9) - expected calls: 0, actual calls: 1",
            failures.to_string());
    }
}
