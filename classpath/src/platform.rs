// vim: tw=80
use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(windows)] {
        const NATIVE: PlatformConfig = PlatformConfig::windows();
    } else {
        const NATIVE: PlatformConfig = PlatformConfig::unix();
    }
}

/// Separators used when rendering a [`Classpath`](crate::Classpath).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlatformConfig {
    /// Joins the entries of a path list, like `:` in `$PATH`
    pub path_separator: char,
    /// Separates the components of one path
    pub dir_separator: char,
}

impl PlatformConfig {
    pub const fn unix() -> Self {
        PlatformConfig{path_separator: ':', dir_separator: '/'}
    }

    pub const fn windows() -> Self {
        PlatformConfig{path_separator: ';', dir_separator: '\\'}
    }

    /// The conventions of the platform this crate was compiled for.
    pub const fn native() -> Self {
        NATIVE
    }

    /// Rewrite every directory separator in `path` into this platform's.
    pub fn native_path(&self, path: &str) -> String {
        path.chars()
            .map(|c| if c == '/' || c == '\\' { self.dir_separator } else { c })
            .collect()
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::native()
    }
}
