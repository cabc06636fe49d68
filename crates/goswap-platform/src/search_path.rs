use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A `PATH`-style search list with one directory cut out.
///
/// The value is handed to a single child process (and to program lookup for
/// that child) instead of being written back to the parent environment, so the
/// exclusion ends with the child on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    value: OsString,
}

impl SearchPath {
    /// The current process `PATH` without `excluded`.
    #[must_use]
    pub fn current_without(excluded: &Path) -> Self {
        Self::without(std::env::var_os("PATH"), excluded)
    }

    #[must_use]
    pub fn without(path: Option<OsString>, excluded: &Path) -> Self {
        let entries: Vec<PathBuf> = path
            .as_deref()
            .map(|value| {
                std::env::split_paths(value)
                    .filter(|entry| entry != excluded)
                    .collect()
            })
            .unwrap_or_default();

        let value = std::env::join_paths(&entries).unwrap_or_else(|err| {
            log::warn!("Could not rebuild search path, leaving it empty: {err}");
            OsString::new()
        });

        Self { value }
    }

    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        &self.value
    }
}
