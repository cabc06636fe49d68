use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use goswap_core::DEFAULT_CATALOG_URL;
use goswap_platform::AppPaths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Overrides `$GOBIN` / `$GOPATH/bin` / `~/go/bin`.
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,

    /// Overrides `~/sdk`.
    #[serde(default)]
    pub sdk_dir: Option<PathBuf>,

    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_http_timeout() -> u64 {
    60
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bin_dir: None,
            sdk_dir: None,
            catalog_url: default_catalog_url(),
            http_timeout_secs: default_http_timeout(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        let Ok(paths) = AppPaths::new() else {
            return Self::default();
        };
        Self::load_from(&paths.settings_file())
    }

    /// A missing or unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                log::warn!("Ignoring invalid settings file {}: {err}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::AppSettings;

    #[test]
    fn defaults_point_at_go_dev_with_one_minute_timeout() {
        let settings = AppSettings::default();

        assert_eq!(settings.catalog_url, "https://go.dev/dl/?mode=json&include=all");
        assert_eq!(settings.http_timeout(), Duration::from_secs(60));
        assert_eq!(settings.max_log_size_bytes, 5 * 1024 * 1024);
        assert!(settings.bin_dir.is_none());
        assert!(!settings.debug_logging);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"bin_dir": "/opt/go/bin", "debug_logging": true}"#)
            .expect("write settings");

        let settings = AppSettings::load_from(&path);

        assert_eq!(settings.bin_dir, Some(PathBuf::from("/opt/go/bin")));
        assert!(settings.debug_logging);
        assert_eq!(settings.http_timeout_secs, 60);
        assert_eq!(settings.sdk_dir, None);
    }

    #[test]
    fn invalid_or_missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("settings.json");

        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        std::fs::write(&path, "{not json").expect("write settings");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }
}
