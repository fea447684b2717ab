// vim: tw=80
//! A call that matches no expectation is always a failure, and its message
//! points at the expectations the test probably meant.

use std::backtrace::Backtrace;

use mockcheck::*;
use pretty_assertions::assert_eq;

#[test]
fn always_fails() {
    let mock = Mock::new("m");
    let missing = MissingExpectation::new(&mock, "foo");
    for _ in 0..10 {
        let err = missing.verify().unwrap_err();
        assert_eq!(ErrorKind::UnexpectedInvocation, err.kind());
    }
}

#[test]
fn always_fails_even_with_a_matching_expectation() {
    let mut mock = Mock::new("m");
    mock.stub::<(), ()>("foo").return_const(());
    assert!(MissingExpectation::new(&mock, "foo").verify().is_err());
}

#[test]
fn message_without_similar_expectations() {
    let mut mock = Mock::new("m");
    mock.expect::<u32, ()>("bar").with_args(1).return_const(());
    let err = MissingExpectation::new(&mock, "foo")
        .verify()
        .unwrap_err();
    assert_eq!("m.foo - expected calls: 0, actual calls: 1", err.message());
    assert!(!err.message().contains("Similar expectations:"));
    assert!(!err.message().ends_with('\n'));
}

#[test]
fn message_with_similar_expectations() {
    let mut mock = Mock::new("m");
    mock.expect::<i32, ()>("foo").with_args(1).return_const(());
    mock.expect::<String, ()>("foo")
        .with_args("x".to_owned())
        .return_const(());
    mock.expect::<i32, ()>("bar").return_const(());
    let err = MissingExpectation::new(&mock, "foo")
        .with_params("")
        .verify()
        .unwrap_err();
    assert_eq!("m.foo() - expected calls: 0, actual calls: 1\n\
                Similar expectations:\n\
                foo(1)\n\
                foo(\"x\")",
               err.message());
}

#[test]
fn display_is_the_message() {
    let mock = Mock::new("m");
    let err = MissingExpectation::new(&mock, "foo")
        .with_params("1, 2")
        .verify()
        .unwrap_err();
    assert_eq!("m.foo(1, 2) - expected calls: 0, actual calls: 1",
               err.to_string());
}

#[test]
fn similar_expectations_are_read_only() {
    let mut mock = Mock::new("m");
    mock.expect::<u32, ()>("foo").with_args(1).return_const(());
    let missing = MissingExpectation::new(&mock, "foo");
    assert_eq!(vec!["foo(1)".to_owned()], missing.similar_expectations());
    assert_eq!(missing.similar_expectations(), missing.similar_expectations());
    assert_eq!(vec!["foo(1)".to_owned()], mock.find_similar("foo"));
    mock.verify().unwrap();
}

#[test]
fn similarity_is_owned_by_the_mock() {
    let mut mock = Mock::new("m").with_similarity(EditDistance::new(1));
    mock.expect::<(), ()>("fob").return_const(());
    mock.expect::<(), ()>("bar").return_const(());
    let missing = MissingExpectation::new(&mock, "foo");
    assert_eq!(vec!["fob(any parameters)".to_owned()],
               missing.similar_expectations());
}

#[test]
fn similarity_by_closure() {
    let mut mock = Mock::new("m")
        .with_similarity(|e: &str, i: &str| e.eq_ignore_ascii_case(i));
    mock.expect::<(), ()>("FOO").return_const(());
    assert_eq!(1, MissingExpectation::new(&mock, "foo")
        .similar_expectations()
        .len());
}

#[test]
fn accessors() {
    let mock = Mock::new("m");
    let missing = MissingExpectation::new(&mock, "foo").with_params("3");
    assert_eq!("foo", missing.method());
    assert_eq!("foo(3)", missing.signature());
    assert_eq!("m", missing.mock().name());
}

#[test]
fn backtrace_starts_in_the_test() {
    let mock = Mock::new("m")
        .with_backtrace_filter(BacktraceFilter::new().force_capture());
    let _ = mock.call::<u32, ()>("foo", 1);
    let err = mock.verify().unwrap_err();
    let frames = err.backtrace().frames();
    assert!(!frames.is_empty());
    assert!(frames[0].symbol
            .starts_with("missing_expectation::backtrace_starts_in_the_test"),
            "{}", err.backtrace());
    assert!(!frames.iter().any(|f| f.symbol.starts_with("mockcheck::")));
}

#[test]
fn filter_backtrace_drops_capture_machinery() {
    let bt = Backtrace::force_capture();
    let bt = BacktraceFilter::new().filter_backtrace(&bt);
    assert!(bt.frames()[0].symbol
            .starts_with("missing_expectation::filter_backtrace_drops_capture"),
            "{}", bt);
}

fn verify_through_helper(mock: &Mock) -> Result<(), ExpectationError> {
    MissingExpectation::new(mock, "foo").verify()
}

#[test]
fn custom_backtrace_filter() {
    let filter = BacktraceFilter::new()
        .force_capture()
        .exclude("missing_expectation::verify_through_helper");
    let mock = Mock::new("m").with_backtrace_filter(filter);
    let err = verify_through_helper(&mock).unwrap_err();
    let frames = err.backtrace().frames();
    assert!(frames[0].symbol
            .starts_with("missing_expectation::custom_backtrace_filter"),
            "{}", err.backtrace());
    assert!(!frames.iter()
        .any(|f| f.symbol.starts_with("missing_expectation::verify_through")));
}
