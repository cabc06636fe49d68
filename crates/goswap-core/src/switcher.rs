use log::{debug, info};
use tokio_util::sync::CancellationToken;

use goswap_backend::{Catalog, Notice, Reporter, SwitchError, Toolchain, is_valid_version};

use crate::fsx::Fsx;
use crate::local::{ACTIVE_LINK, Local, resolve_local};
use crate::sdk::has_sdk;

/// Result of a successful `use`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseOutcome {
    AlreadyActive { version: String },
    SwitchedToMain { version: String },
    Switched { version: String },
}

/// Result of a successful `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub version: String,
    /// Set when the removed version was current and main took over.
    pub switched_to_main: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// List the remote catalog instead of the local versions.
    pub all: bool,
    /// Keep only versions starting with this prefix.
    pub only: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Main,
    NotInstalled,
    MissingSdk,
}

impl Annotation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::NotInstalled => "not installed",
            Self::MissingSdk => "missing SDK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub version: String,
    pub annotation: Option<Annotation>,
    pub current: bool,
}

/// The switching engine: `use`, `remove` and `list` over the bin and sdk
/// directories.
///
/// Every operation starts from a fresh [`Local`] snapshot. Two goswap
/// processes running at once can race on the `go` symlink; nothing here locks.
pub struct Switcher {
    bin: Box<dyn Fsx>,
    sdk: Box<dyn Fsx>,
    toolchain: Box<dyn Toolchain>,
    catalog: Box<dyn Catalog>,
}

impl Switcher {
    #[must_use]
    pub fn new(
        bin: Box<dyn Fsx>,
        sdk: Box<dyn Fsx>,
        toolchain: Box<dyn Toolchain>,
        catalog: Box<dyn Catalog>,
    ) -> Self {
        Self {
            bin,
            sdk,
            toolchain,
            catalog,
        }
    }

    /// # Errors
    /// See [`resolve_local`].
    pub async fn local(&self, cancel: &CancellationToken) -> Result<Local, SwitchError> {
        resolve_local(self.toolchain.as_ref(), self.bin.as_ref(), cancel).await
    }

    fn unlink_active(&self) -> Result<(), SwitchError> {
        match self.bin.remove(ACTIVE_LINK) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    /// Make `version` the active toolchain, installing the launcher and the
    /// SDK first when they are missing.
    ///
    /// Safe to re-run after an interruption at any step: the SDK is checked
    /// again even when the launcher already exists.
    ///
    /// # Errors
    /// Fails on a malformed version, and propagates toolchain, install,
    /// download and filesystem errors.
    pub async fn use_version(
        &self,
        version: &str,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<UseOutcome, SwitchError> {
        let local = self.local(cancel).await?;
        let version = local.resolve_alias(version).to_string();

        if !is_valid_version(&version) {
            return Err(SwitchError::malformed(version));
        }

        if version == local.current() {
            debug!("{version} is already current");
            return Ok(UseOutcome::AlreadyActive { version });
        }

        if version == local.main() {
            self.unlink_active()?;
            info!("Switched to main version {version}");
            return Ok(UseOutcome::SwitchedToMain { version });
        }

        let initial = !local.contains(&version);
        if initial {
            reporter.notice(Notice::NotInstalled {
                version: version.clone(),
            });
            self.toolchain.install(&version, cancel).await?;
        }

        if !has_sdk(&version, self.sdk.as_ref()) {
            if !initial {
                reporter.notice(Notice::MissingSdk {
                    version: version.clone(),
                });
            }
            self.toolchain.download_sdk(&version, cancel).await?;
        }

        self.unlink_active()?;
        self.bin.symlink(&format!("go{version}"), ACTIVE_LINK)?;

        info!("Switched to {version}");
        Ok(UseOutcome::Switched { version })
    }

    /// Delete the launcher and SDK of `version`, switching to main first when
    /// it is current.
    ///
    /// A failure part-way leaves whatever was not yet deleted in place.
    ///
    /// # Errors
    /// Fails on a malformed or uninstalled version and on the main version;
    /// propagates filesystem errors.
    pub async fn remove(
        &self,
        version: &str,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<RemoveOutcome, SwitchError> {
        let local = self.local(cancel).await?;
        let version = local.resolve_alias(version).to_string();

        if !is_valid_version(&version) {
            return Err(SwitchError::malformed(version));
        }

        if !local.contains(&version) {
            return Err(SwitchError::NotInstalled { version });
        }

        if version == local.main() {
            return Err(SwitchError::CannotRemoveMain { version });
        }

        let mut switched_to_main = None;
        if version == local.current() {
            self.unlink_active()?;
            reporter.notice(Notice::SwitchedToMain {
                version: local.main().to_string(),
            });
            switched_to_main = Some(local.main().to_string());
        }

        let name = format!("go{version}");
        self.bin.remove(&name)?;
        self.sdk.remove_all(&name)?;

        info!("Removed {version}");
        Ok(RemoveOutcome {
            version,
            switched_to_main,
        })
    }

    /// Local versions in ascending order, or the remote catalog in server
    /// order, annotated against the local snapshot.
    ///
    /// # Errors
    /// Propagates snapshot and catalog errors.
    pub async fn list(
        &self,
        filter: &ListFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<ListEntry>, SwitchError> {
        let local = self.local(cancel).await?;

        let versions: Vec<String> = if filter.all {
            self.catalog
                .releases(cancel)
                .await?
                .into_iter()
                .map(|release| release.version)
                .collect()
        } else {
            local.list().to_vec()
        };

        Ok(versions
            .into_iter()
            .filter(|version| version.starts_with(&filter.only))
            .map(|version| {
                let annotation = if version == local.main() {
                    Some(Annotation::Main)
                } else if !local.contains(&version) {
                    Some(Annotation::NotInstalled)
                } else if !has_sdk(&version, self.sdk.as_ref()) {
                    Some(Annotation::MissingSdk)
                } else {
                    None
                };
                ListEntry {
                    current: version == local.current(),
                    annotation,
                    version,
                }
            })
            .collect())
    }
}
