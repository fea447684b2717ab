// vim: tw=80
//! Policies for deciding which registered expectations "resemble" a method
//! that was called without one.
//!
//! Similar expectations are only used to enrich failure messages, so a policy
//! never affects whether a call matches.

/// Decides whether an expectation for `expected` is worth mentioning when
/// `invoked` was called unexpectedly.
pub trait Similarity: Send + Sync {
    fn is_similar(&self, expected: &str, invoked: &str) -> bool;
}

impl<F> Similarity for F
    where F: Fn(&str, &str) -> bool + Send + Sync
{
    fn is_similar(&self, expected: &str, invoked: &str) -> bool {
        self(expected, invoked)
    }
}

/// Exact, case-sensitive method name equality.  Arguments play no part, so
/// `foo(1)` and `foo(1, 2)` are both similar to any call of `foo`.
///
/// This is the default policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SameName;

impl Similarity for SameName {
    fn is_similar(&self, expected: &str, invoked: &str) -> bool {
        expected == invoked
    }
}

/// Method names within a Levenshtein distance of `max`.  Catches typos like
/// calling `lenght` when `length` was expected.
#[derive(Clone, Copy, Debug)]
pub struct EditDistance {
    max: usize
}

impl EditDistance {
    pub fn new(max: usize) -> Self {
        EditDistance{max}
    }
}

impl Similarity for EditDistance {
    fn is_similar(&self, expected: &str, invoked: &str) -> bool {
        levenshtein(expected, invoked) <= self.max
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let subst = prev[j] + usize::from(ca != *cb);
            cur[j + 1] = subst.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
