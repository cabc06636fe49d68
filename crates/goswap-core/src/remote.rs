use async_trait::async_trait;
use log::{debug, info};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use goswap_backend::{Catalog, RemoteRelease, SwitchError};

pub const DEFAULT_CATALOG_URL: &str = "https://go.dev/dl/?mode=json&include=all";
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(60);

const OPERATION: &str = "list remote versions";

/// Release catalog served by go.dev.
#[derive(Debug, Clone)]
pub struct GoDevCatalog {
    client: reqwest::Client,
    url: String,
}

impl GoDevCatalog {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SwitchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("goswap/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SwitchError::network_request_from(OPERATION, e))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn fetch(&self) -> Result<Vec<RemoteRelease>, SwitchError> {
        info!("Fetching release catalog from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SwitchError::network_request_from(OPERATION, e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| SwitchError::network_request_from(OPERATION, e))?;

        let releases = decode_releases(&body)?;
        debug!("Catalog returned {} releases", releases.len());
        Ok(releases)
    }

    /// Published releases, newest first. One request, no retry.
    ///
    /// # Errors
    /// Returns a network error for transport failures and non-2xx statuses, a
    /// parse-stage error for an undecodable body, and
    /// [`SwitchError::Cancelled`] when `cancel` fires first.
    pub async fn list_remote(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteRelease>, SwitchError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SwitchError::Cancelled),
            result = self.fetch() => result,
        }
    }
}

/// Decode the catalog body and strip the `go` prefix from every version,
/// keeping the server's newest-first order.
///
/// # Errors
/// Returns a response-parse network error when the body is not the expected
/// JSON array.
pub fn decode_releases(body: &[u8]) -> Result<Vec<RemoteRelease>, SwitchError> {
    let releases: Vec<RemoteRelease> =
        serde_json::from_slice(body).map_err(|e| SwitchError::network_parse_from(OPERATION, e))?;

    Ok(releases
        .into_iter()
        .map(|release| RemoteRelease {
            version: release
                .version
                .strip_prefix("go")
                .map_or(release.version.clone(), str::to_string),
            stable: release.stable,
        })
        .collect())
}

#[async_trait]
impl Catalog for GoDevCatalog {
    async fn releases(&self, cancel: &CancellationToken) -> Result<Vec<RemoteRelease>, SwitchError> {
        self.list_remote(cancel).await
    }
}
