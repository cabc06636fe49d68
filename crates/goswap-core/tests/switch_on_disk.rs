#![cfg(unix)]

use std::path::PathBuf;

use async_trait::async_trait;
use goswap_core::{
    Catalog, DirFs, Notice, RemoteRelease, SwitchError, Switcher, Toolchain, UseOutcome,
};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

struct DiskToolchain {
    main: &'static str,
    bin_dir: PathBuf,
    sdk_dir: PathBuf,
}

#[async_trait]
impl Toolchain for DiskToolchain {
    async fn self_report(&self, _cancel: &CancellationToken) -> Result<String, SwitchError> {
        Ok(format!("go version go{} linux/amd64\n", self.main))
    }

    async fn install(&self, version: &str, _cancel: &CancellationToken) -> Result<(), SwitchError> {
        std::fs::create_dir_all(&self.bin_dir)?;
        std::fs::write(self.bin_dir.join(format!("go{version}")), "#!/bin/sh\n")?;
        Ok(())
    }

    async fn download_sdk(
        &self,
        version: &str,
        _cancel: &CancellationToken,
    ) -> Result<(), SwitchError> {
        let root = self.sdk_dir.join(format!("go{version}"));
        std::fs::create_dir_all(root.join("bin"))?;
        std::fs::write(root.join("bin/go"), "")?;
        std::fs::write(root.join(".unpacked-success"), "")?;
        Ok(())
    }
}

struct NoCatalog;

#[async_trait]
impl Catalog for NoCatalog {
    async fn releases(&self, _cancel: &CancellationToken) -> Result<Vec<RemoteRelease>, SwitchError> {
        Ok(Vec::new())
    }
}

fn switcher(bin_dir: &std::path::Path, sdk_dir: &std::path::Path) -> Switcher {
    Switcher::new(
        Box::new(DirFs::new(bin_dir)),
        Box::new(DirFs::new(sdk_dir)),
        Box::new(DiskToolchain {
            main: "1.21",
            bin_dir: bin_dir.to_path_buf(),
            sdk_dir: sdk_dir.to_path_buf(),
        }),
        Box::new(NoCatalog),
    )
}

#[tokio::test]
async fn install_switch_and_remove_on_disk() {
    let temp_dir = tempdir().expect("create temp dir");
    let bin_dir = temp_dir.path().join("bin");
    let sdk_dir = temp_dir.path().join("sdk");
    let switcher = switcher(&bin_dir, &sdk_dir);
    let cancel = CancellationToken::new();
    let notices = std::sync::Mutex::new(Vec::new());
    let reporter = |notice: Notice| notices.lock().expect("lock").push(notice);

    let outcome = switcher
        .use_version("1.20", &reporter, &cancel)
        .await
        .expect("use 1.20");
    assert_eq!(
        outcome,
        UseOutcome::Switched {
            version: "1.20".to_string()
        }
    );
    assert_eq!(
        std::fs::read_link(bin_dir.join("go")).expect("read link"),
        PathBuf::from("go1.20")
    );
    assert!(sdk_dir.join("go1.20/.unpacked-success").exists());

    let local = switcher.local(&cancel).await.expect("resolve");
    assert_eq!(local.current(), "1.20");
    assert_eq!(local.list(), ["1.20", "1.21"]);

    let removed = switcher
        .remove("1.20", &reporter, &cancel)
        .await
        .expect("remove 1.20");
    assert_eq!(removed.switched_to_main.as_deref(), Some("1.21"));
    assert!(std::fs::symlink_metadata(bin_dir.join("go")).is_err());
    assert!(!bin_dir.join("go1.20").exists());
    assert!(!sdk_dir.join("go1.20").exists());

    assert_eq!(
        notices.into_inner().expect("lock"),
        vec![
            Notice::NotInstalled {
                version: "1.20".to_string()
            },
            Notice::SwitchedToMain {
                version: "1.21".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn switching_replaces_existing_link() {
    let temp_dir = tempdir().expect("create temp dir");
    let bin_dir = temp_dir.path().join("bin");
    let sdk_dir = temp_dir.path().join("sdk");
    let switcher = switcher(&bin_dir, &sdk_dir);
    let cancel = CancellationToken::new();
    let quiet = |_: Notice| {};

    switcher.use_version("1.19", &quiet, &cancel).await.expect("use 1.19");
    switcher.use_version("1.20", &quiet, &cancel).await.expect("use 1.20");

    assert_eq!(
        std::fs::read_link(bin_dir.join("go")).expect("read link"),
        PathBuf::from("go1.20")
    );

    switcher.use_version("main", &quiet, &cancel).await.expect("use main");
    let local = switcher.local(&cancel).await.expect("resolve");
    assert_eq!(local.current(), "1.21");
    assert_eq!(local.list(), ["1.19", "1.20", "1.21"]);
}
