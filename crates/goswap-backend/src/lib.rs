mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, NetworkStage, SwitchError};
pub use traits::{Catalog, Notice, Reporter, Toolchain};
pub use types::{
    GoVersion, PreRelease, PreReleaseKind, RemoteRelease, VersionParseError, is_valid_version,
    less,
};
