// vim: tw=80
//! Rendering of method signatures for failure messages.

use std::fmt::{Debug, Display};

/// Render a method's arguments as they would appear between its parentheses.
///
/// Multiple arguments are passed as a tuple, whose own parentheses (and the
/// trailing comma of a 1-tuple) are dropped.
pub(crate) fn params<T: Debug + ?Sized>(args: &T) -> String {
    let s = format!("{:?}", args);
    match s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => inner.trim_end_matches(',').to_owned(),
        None => s
    }
}

/// `method(params)`, or just `method` when nothing is known about the
/// arguments.
pub(crate) fn render(method: &str, params: Option<&str>) -> String {
    match params {
        Some(p) => format!("{}({})", method, p),
        None => method.to_owned()
    }
}

pub(crate) fn count_mismatch<E: Display>(signature: &str, expected: E,
                                         actual: usize) -> String
{
    format!("{} - expected calls: {}, actual calls: {}", signature, expected,
            actual)
}
