use async_trait::async_trait;
use log::{debug, error, info, trace};
use std::path::PathBuf;
use std::process::{ExitStatus, Output};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use goswap_backend::{SwitchError, Toolchain};
use goswap_platform::SearchPath;

const DL_MODULE: &str = "golang.org/dl";

/// [`Toolchain`] that runs the real `go` binaries.
#[derive(Debug, Clone)]
pub struct SystemToolchain {
    bin_dir: PathBuf,
}

impl SystemToolchain {
    #[must_use]
    pub fn new(bin_dir: PathBuf) -> Self {
        Self { bin_dir }
    }

    /// `go` resolved through a search path that skips the bin directory, so the
    /// managed symlink can never answer.
    fn main_go_command(&self) -> Result<Command, SwitchError> {
        let search_path = SearchPath::current_without(&self.bin_dir);
        let cwd = std::env::current_dir()?;
        let program = which::which_in("go", Some(search_path.as_os_str()), cwd).map_err(|err| {
            SwitchError::Io {
                kind: std::io::ErrorKind::NotFound,
                message: format!("go: {err}"),
            }
        })?;

        debug!("Main toolchain resolved to {}", program.display());

        let mut cmd = Command::new(program);
        cmd.env("PATH", search_path.as_os_str());
        Ok(cmd)
    }

    fn launcher(&self, version: &str) -> PathBuf {
        self.bin_dir.join(format!("go{version}"))
    }
}

async fn output(mut cmd: Command, cancel: &CancellationToken) -> Result<Output, SwitchError> {
    cmd.kill_on_drop(true);
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(SwitchError::Cancelled),
        result = cmd.output() => Ok(result?),
    }
}

async fn status(mut cmd: Command, cancel: &CancellationToken) -> Result<ExitStatus, SwitchError> {
    cmd.kill_on_drop(true);
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(SwitchError::Cancelled),
        result = cmd.status() => Ok(result?),
    }
}

#[async_trait]
impl Toolchain for SystemToolchain {
    async fn self_report(&self, cancel: &CancellationToken) -> Result<String, SwitchError> {
        let mut cmd = self.main_go_command()?;
        cmd.arg("version");

        let output = output(cmd, cancel).await?;
        debug!("go version exit status: {:?}", output.status);
        trace!("go version stdout: {}", String::from_utf8_lossy(&output.stdout));

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("go version failed: stderr='{stderr}'");
            Err(SwitchError::CommandFailed {
                program: "go version".to_string(),
                details: if stderr.is_empty() {
                    output.status.to_string()
                } else {
                    stderr
                },
            })
        }
    }

    async fn install(&self, version: &str, cancel: &CancellationToken) -> Result<(), SwitchError> {
        let module = format!("{DL_MODULE}/go{version}@latest");
        info!("Installing {module} into {}", self.bin_dir.display());

        let mut cmd = Command::new("go");
        cmd.args(["install", module.as_str()]).env("GOBIN", &self.bin_dir);

        let status = status(cmd, cancel).await?;
        if status.success() {
            Ok(())
        } else {
            error!("go install {module} failed: {status}");
            Err(SwitchError::install_failed("install", format!("go install {module}: {status}")))
        }
    }

    async fn download_sdk(
        &self,
        version: &str,
        cancel: &CancellationToken,
    ) -> Result<(), SwitchError> {
        let launcher = self.launcher(version);
        info!("Downloading SDK with {} download", launcher.display());

        let mut cmd = Command::new(&launcher);
        cmd.arg("download");

        let status = status(cmd, cancel).await?;
        if status.success() {
            Ok(())
        } else {
            error!("go{version} download failed: {status}");
            Err(SwitchError::install_failed(
                "download",
                format!("go{version} download: {status}"),
            ))
        }
    }
}
