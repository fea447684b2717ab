// vim: tw=80
//! Call-site backtraces with mockcheck's own frames removed.
//!
//! A failure reported by a mock is almost never mockcheck's fault, so the
//! frames worth looking at are the ones belonging to the test that set up and
//! exercised the mock.  [`BacktraceFilter`] decides which frames are internal,
//! and [`FilteredBacktrace`] holds whatever survived the filter.
//!
//! Internal frames are interleaved with frames from `core` and `alloc` that
//! the machinery calls through, like iterator adapters and `Result::map_err`.
//! Those can't be recognized by name, so everything up to and including the
//! outermost internal frame is dropped.

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    fmt::{self, Display}
};

/// Symbol prefixes that are always considered internal.
const INTERNAL: &[&str] = &[
    concat!(env!("CARGO_CRATE_NAME"), "::"),
    concat!("<", env!("CARGO_CRATE_NAME"), "::"),
    "std::backtrace::",
    "std::backtrace_rs::",
];

/// One stack frame, as rendered by [`std::backtrace::Backtrace`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// Demangled symbol name
    pub symbol: String,
    /// `file:line:column`, when debug info was available
    pub location: Option<String>,
}

impl Frame {
    /// Parse the textual form of a captured backtrace.
    ///
    /// Each frame starts with a line like `  3: some::symbol` and may be
    /// followed by a line like `     at src/lib.rs:10:5`.  Anything else, such
    /// as the `disabled backtrace` placeholder, is ignored.
    pub fn parse_all(text: &str) -> Vec<Frame> {
        let mut frames: Vec<Frame> = Vec::new();
        for line in text.lines().map(str::trim) {
            if let Some(loc) = line.strip_prefix("at ") {
                if let Some(frame) = frames.last_mut() {
                    frame.location.get_or_insert_with(|| loc.to_owned());
                }
                continue;
            }
            let Some((index, symbol)) = line.split_once(": ") else {
                continue;
            };
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push(Frame {
                    symbol: symbol.trim().to_owned(),
                    location: None
                });
            }
        }
        frames
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} at {}", self.symbol, loc),
            None => f.write_str(&self.symbol)
        }
    }
}

/// Decides which frames belong to the mocking machinery.
#[derive(Clone, Debug)]
pub struct BacktraceFilter {
    prefixes: Vec<String>,
    force: bool,
}

impl BacktraceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also treat frames whose symbol starts with `prefix` as internal.
    ///
    /// Useful for shared test helpers that wrap a [`Mock`](crate::Mock).
    /// Every frame called by an excluded one is dropped too, so the prefix
    /// should name code near the top of the stack, never `core::` or `std::`.
    pub fn exclude(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn is_internal(&self, frame: &Frame) -> bool {
        self.prefixes.iter().any(|p| frame.symbol.starts_with(p.as_str()))
    }

    /// Capture backtraces even when `RUST_BACKTRACE` is unset.
    pub fn force_capture(mut self) -> Self {
        self.force = true;
        self
    }

    /// Capture the current stack and filter it.
    ///
    /// Unless [`force_capture`](#method.force_capture) was requested,
    /// capturing obeys `RUST_BACKTRACE` and `RUST_LIB_BACKTRACE`; when
    /// backtraces are disabled the result is empty.
    pub fn capture(&self) -> FilteredBacktrace {
        let bt = if self.force {
            Backtrace::force_capture()
        } else {
            Backtrace::capture()
        };
        self.filter_backtrace(&bt)
    }

    /// Filter an already captured backtrace.
    pub fn filter_backtrace(&self, bt: &Backtrace) -> FilteredBacktrace {
        if bt.status() != BacktraceStatus::Captured {
            return FilteredBacktrace::default();
        }
        self.filter(Frame::parse_all(&bt.to_string()))
    }

    /// Drop every frame up to and including the outermost internal one.
    pub fn filter<I>(&self, frames: I) -> FilteredBacktrace
        where I: IntoIterator<Item=Frame>
    {
        let mut frames = frames.into_iter().collect::<Vec<_>>();
        if let Some(i) = frames.iter().rposition(|f| self.is_internal(f)) {
            frames.drain(..=i);
        }
        FilteredBacktrace{frames}
    }
}

impl Default for BacktraceFilter {
    fn default() -> Self {
        let prefixes = INTERNAL.iter().map(|p| p.to_string()).collect();
        BacktraceFilter{prefixes, force: false}
    }
}

/// A backtrace containing only frames outside of the mocking machinery.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilteredBacktrace {
    frames: Vec<Frame>,
}

impl FilteredBacktrace {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Display for FilteredBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "{:4}: {}", i, frame)?;
        }
        Ok(())
    }
}
