use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SwitchError;
use crate::types::RemoteRelease;

/// The process-facing side of the toolchain.
///
/// Implementations spawn real binaries in production; tests substitute fakes so
/// the switching engine can run without a Go installation.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Raw output of `go version` for the main toolchain, with the managed bin
    /// directory excluded from the search path.
    async fn self_report(&self, cancel: &CancellationToken) -> Result<String, SwitchError>;

    /// Install the `go<version>` launcher binary into the bin directory.
    async fn install(&self, version: &str, cancel: &CancellationToken) -> Result<(), SwitchError>;

    /// Run `go<version> download` to fetch and unpack the release SDK.
    async fn download_sdk(
        &self,
        version: &str,
        cancel: &CancellationToken,
    ) -> Result<(), SwitchError>;
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Published releases, newest first, exactly as served.
    async fn releases(&self, cancel: &CancellationToken) -> Result<Vec<RemoteRelease>, SwitchError>;
}

/// Progress notices emitted while a state-changing operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotInstalled { version: String },
    MissingSdk { version: String },
    SwitchedToMain { version: String },
}

pub trait Reporter: Send + Sync {
    fn notice(&self, notice: Notice);
}

impl<F> Reporter for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notice(&self, notice: Notice) {
        self(notice);
    }
}
