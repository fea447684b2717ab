// vim: tw=80
use std::{
    fmt::{self, Display},
    ops::Range,
    sync::atomic::{AtomicUsize, Ordering}
};

/// How many times an expectation may be called, and how many times it has
/// been.
///
/// The allowed range is half-open, like [`Range`].  Counting never fails by
/// itself; violations are reported when the owning expectation is verified.
#[derive(Debug)]
pub struct Times {
    /// How many times has the expectation already been called?
    count: AtomicUsize,
    range: Range<usize>
}

impl Times {
    /// Record one call.
    pub fn call(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn any(&mut self) {
        self.range = 0..usize::MAX;
    }

    pub fn at_least(&mut self, n: usize) {
        self.range = n..usize::MAX;
    }

    pub fn at_most(&mut self, n: usize) {
        self.range = 0..n.saturating_add(1);
    }

    /// How many times has the expectation been called so far?
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Has this expectation already been called the maximum allowed number of
    /// times?
    pub fn is_done(&self) -> bool {
        self.count().saturating_add(1) >= self.range.end
    }

    /// Is it required that this expectation be called an exact number of times,
    /// or may it be satisfied by a range of call counts?
    pub fn is_exact(&self) -> bool {
        self.range.end.saturating_sub(self.range.start) == 1
    }

    /// Is the current call count within the allowed range?
    pub fn is_satisfied(&self) -> bool {
        self.range.contains(&self.count())
    }

    pub fn n(&mut self, n: usize) {
        self.range = n..n.saturating_add(1);
    }

    pub fn never(&mut self) {
        self.range = 0..1;
    }

    pub fn range(&mut self, range: Range<usize>) {
        self.range = range;
    }
}

impl Default for Times {
    fn default() -> Self {
        // By default, allow any number of calls
        let count = AtomicUsize::default();
        let range = 0..usize::MAX;
        Times{count, range}
    }
}

/// Renders the allowed range the way failure messages quote it.
impl Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Range{start, end} = self.range;
        if self.is_exact() {
            write!(f, "{}", start)
        } else if end == usize::MAX {
            if start == 0 {
                f.write_str("any number")
            } else {
                write!(f, "at least {}", start)
            }
        } else if end <= start {
            f.write_str("none possible")
        } else if start == 0 {
            write!(f, "at most {}", end - 1)
        } else {
            write!(f, "between {} and {}", start, end - 1)
        }
    }
}
