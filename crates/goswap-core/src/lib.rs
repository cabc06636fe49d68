//! Version-state resolution and switching for goswap.
//!
//! - [`Fsx`] abstracts the bin and sdk directories ([`DirFs`], [`MemFs`]).
//! - [`resolve_local`] reconciles the main toolchain, the `go` symlink and the
//!   bin directory listing into a [`Local`] snapshot.
//! - [`Switcher`] implements `use`, `remove` and `list` on top of it.

mod fsx;
mod local;
mod remote;
mod sdk;
mod switcher;
mod toolchain;

pub use fsx::{DirEntry, DirFs, Fsx, MemFs};
pub use local::{Local, parse_self_report, resolve_local};
pub use remote::{DEFAULT_CATALOG_URL, DEFAULT_CATALOG_TIMEOUT, GoDevCatalog, decode_releases};
pub use sdk::{SDK_SENTINEL, has_sdk};
pub use switcher::{Annotation, ListEntry, ListFilter, RemoveOutcome, Switcher, UseOutcome};
pub use toolchain::SystemToolchain;

pub use goswap_backend::{
    Catalog, ErrorCategory, Notice, RemoteRelease, Reporter, SwitchError, Toolchain,
    is_valid_version, less,
};
