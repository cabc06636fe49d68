use crate::fsx::Fsx;

/// Zero-byte marker written by `go<version> download` once the SDK archive is
/// fully unpacked.
pub const SDK_SENTINEL: &str = ".unpacked-success";

/// Whether the SDK for `version` is fully unpacked under `sdk`.
///
/// Any error reading the sdk directory counts as "absent": a missing SDK is
/// always recoverable by downloading it again.
pub fn has_sdk(version: &str, sdk: &dyn Fsx) -> bool {
    let sentinel = format!("go{version}/{SDK_SENTINEL}");
    match sdk.exists(&sentinel) {
        Ok(found) => found,
        Err(err) => {
            log::debug!("Treating SDK for {version} as absent: {err}");
            false
        }
    }
}
