use std::cmp::Ordering;
use std::path::Path;

use goswap_backend::{SwitchError, Toolchain, is_valid_version, less};
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::fsx::Fsx;

/// Name of the switchable symlink inside the bin directory.
pub(crate) const ACTIVE_LINK: &str = "go";

/// A snapshot of the locally known versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    main: String,
    current: String,
    list: Vec<String>,
}

impl Local {
    /// The version of the system toolchain, outside goswap's management.
    #[must_use]
    pub fn main(&self) -> &str {
        &self.main
    }

    /// The version answering through the `go` symlink, or `main` without one.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// All local versions in ascending order, `main` included.
    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.list
    }

    #[must_use]
    pub fn contains(&self, version: &str) -> bool {
        self.list.iter().any(|v| v == version)
    }

    /// Expand the `main` alias.
    #[must_use]
    pub fn resolve_alias<'a>(&'a self, version: &'a str) -> &'a str {
        if version == "main" { &self.main } else { version }
    }
}

/// Extract the version from `go version` output such as
/// `go version go1.21.3 linux/amd64`.
///
/// # Errors
/// Returns [`SwitchError::UnexpectedOutput`] unless the output has exactly four
/// whitespace-separated tokens.
pub fn parse_self_report(output: &str) -> Result<String, SwitchError> {
    let parts: Vec<&str> = output.split_whitespace().collect();
    let [_, _, version, _] = parts.as_slice() else {
        return Err(SwitchError::UnexpectedOutput {
            output: output.to_string(),
        });
    };
    Ok(version.strip_prefix("go").unwrap_or(version).to_string())
}

fn version_from_target(target: &Path) -> String {
    let base = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.strip_prefix("go").unwrap_or(&base).to_string()
}

fn by_version(a: &String, b: &String) -> Ordering {
    if less(a, b) {
        Ordering::Less
    } else if less(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Build a fresh [`Local`] snapshot.
///
/// Nothing is cached: every call asks the toolchain and re-reads the bin
/// directory.
///
/// # Errors
/// Propagates toolchain failures, a malformed self-report, and symlink or
/// listing errors other than "not found".
pub async fn resolve_local(
    toolchain: &dyn Toolchain,
    bin: &dyn Fsx,
    cancel: &CancellationToken,
) -> Result<Local, SwitchError> {
    let main = parse_self_report(&toolchain.self_report(cancel).await?)?;

    let current = match bin.read_link(ACTIVE_LINK) {
        Ok(target) => version_from_target(&target),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => main.clone(),
        Err(err) => return Err(err.into()),
    };

    let entries = match bin.read_dir() {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("Bin directory does not exist yet, no installed versions");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };

    let mut list = vec![main.clone()];
    list.extend(
        entries
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter_map(|entry| entry.name.strip_prefix("go").map(str::to_string))
            .filter(|version| is_valid_version(version)),
    );
    list.sort_by(by_version);
    list.dedup();

    debug!("Resolved local versions: main={main}, current={current}, list={list:?}");

    Ok(Local {
        main,
        current,
        list,
    })
}
