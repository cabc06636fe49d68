use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppPathsError {
    #[error("Could not determine home directory")]
    HomeDirUnavailable,
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
}

pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Build application paths for the current platform.
    ///
    /// # Errors
    /// Returns an error when the user config or data directory cannot be
    /// determined.
    pub fn new() -> Result<Self, AppPathsError> {
        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().ok_or(AppPathsError::HomeDirUnavailable)?;
            Ok(Self {
                config_dir: home.join("Library/Application Support/goswap"),
                data_dir: home.join("Library/Application Support/goswap"),
            })
        }

        #[cfg(not(target_os = "macos"))]
        {
            Ok(Self {
                config_dir: dirs::config_dir()
                    .ok_or(AppPathsError::ConfigDirUnavailable)?
                    .join("goswap"),
                data_dir: dirs::data_dir()
                    .ok_or(AppPathsError::DataDirUnavailable)?
                    .join("goswap"),
            })
        }
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("debug.log")
    }

    /// Ensure all application directories exist on disk.
    ///
    /// # Errors
    /// Returns an error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// The two roots goswap manages: launcher binaries and unpacked SDKs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDirs {
    pub bin_dir: PathBuf,
    pub sdk_dir: PathBuf,
}

impl ToolchainDirs {
    /// Locate the bin and sdk directories, honoring explicit overrides first.
    ///
    /// The bin directory falls back to `$GOBIN`, then `$GOPATH/bin` (first
    /// `GOPATH` entry), then `~/go/bin`. The sdk directory falls back to
    /// `~/sdk`, where `golang.org/dl` launchers unpack releases.
    ///
    /// # Errors
    /// Returns an error when a fallback is needed and the home directory is
    /// unknown.
    pub fn detect(
        bin_override: Option<PathBuf>,
        sdk_override: Option<PathBuf>,
    ) -> Result<Self, AppPathsError> {
        let home = dirs::home_dir();

        let bin_dir = match bin_override {
            Some(dir) => dir,
            None => select_bin_dir(
                std::env::var_os("GOBIN"),
                std::env::var_os("GOPATH"),
                home.as_deref(),
            )
            .ok_or(AppPathsError::HomeDirUnavailable)?,
        };

        let sdk_dir = match sdk_override {
            Some(dir) => dir,
            None => home
                .as_deref()
                .map(default_sdk_dir)
                .ok_or(AppPathsError::HomeDirUnavailable)?,
        };

        log::debug!(
            "Using bin dir {} and sdk dir {}",
            bin_dir.display(),
            sdk_dir.display()
        );

        Ok(Self { bin_dir, sdk_dir })
    }
}

fn select_bin_dir(
    gobin: Option<OsString>,
    gopath: Option<OsString>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(gobin) = gobin.filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(gobin));
    }

    if let Some(first) = gopath
        .filter(|value| !value.is_empty())
        .and_then(|value| std::env::split_paths(&value).next())
        .filter(|path| !path.as_os_str().is_empty())
    {
        return Some(first.join("bin"));
    }

    home.map(|home| home.join("go").join("bin"))
}

fn default_sdk_dir(home: &Path) -> PathBuf {
    home.join("sdk")
}
