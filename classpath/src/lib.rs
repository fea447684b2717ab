// vim: tw=80
//! Build classpath strings from glob patterns.
//!
//! A [`Classpath`] collects the files matching glob patterns below a root
//! directory, in the order the patterns were appended, and renders them as a
//! single string using the separators described by a [`PlatformConfig`].  The
//! result is suitable for a `CLASSPATH`-style environment variable of a child
//! process.
//!
//! ```no_run
//! use classpath::{Classpath, PlatformConfig};
//!
//! let mut cp = Classpath::new("/proj");
//! cp.append("lib/*.jar")?
//!   .append("build/classes")?;
//! let s = cp.render(&PlatformConfig::unix());
//! // "/proj/lib/a.jar:/proj/lib/b.jar:/proj/build/classes"
//! # Ok::<(), classpath::Error>(())
//! ```

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Command
};

use thiserror::Error;
use tracing::debug;

mod platform;

pub use crate::platform::PlatformConfig;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// The filesystem could not be read while expanding a pattern
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
    #[error("classpath root is not valid UTF-8: {}", .0.display())]
    NonUtf8Root(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

/// An ordered list of filesystem locations below a common root.
#[derive(Clone, Debug)]
pub struct Classpath {
    root: PathBuf,
    locations: Vec<PathBuf>,
}

impl Classpath {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Classpath{root: root.into(), locations: Vec::new()}
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Append every path matching `pattern`, relative to the root.
    ///
    /// Matches of one pattern are appended in lexical order, after everything
    /// appended before.  A pattern matching nothing appends nothing.  Glob
    /// metacharacters in the root itself are taken literally.
    ///
    /// Either every match is appended or, on error, none is.
    pub fn append(&mut self, pattern: &str) -> Result<&mut Self> {
        let root = self.root.to_str()
            .ok_or_else(|| Error::NonUtf8Root(self.root.clone()))?;
        let root = root.trim_end_matches(['/', '\\']);
        let full = format!("{}/{}", glob::Pattern::escape(root), pattern);
        let found = glob::glob(&full)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(pattern = %full, matches = found.len(), "appending to classpath");
        self.locations.extend(found);
        Ok(self)
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Join every location, converted to the platform's directory separator,
    /// with the platform's path separator.
    pub fn render(&self, platform: &PlatformConfig) -> String {
        let sep = platform.path_separator.to_string();
        self.locations.iter()
            .map(|p| platform.native_path(&p.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(&sep)
    }

    /// Set the environment variable `var` of `cmd` to the rendered classpath.
    pub fn export<'a, K>(&self, cmd: &'a mut Command, var: K,
                         platform: &PlatformConfig) -> &'a mut Command
        where K: AsRef<OsStr>
    {
        cmd.env(var, self.render(platform))
    }
}
