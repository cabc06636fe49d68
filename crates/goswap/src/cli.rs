use clap::{Args, Parser, Subcommand};

/// Switch between Go toolchain releases.
///
/// Releases are installed as `go<version>` launchers next to the main `go`
/// binary; the active one is selected through a `go` symlink in the same
/// directory.
#[derive(Debug, Parser)]
#[command(name = "goswap", version)]
pub struct Cli {
    /// Print debug logging to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Switch to a version, installing it first if needed.
    Use {
        /// A version such as 1.21.3 or 1.22rc1, or `main`.
        version: String,
    },

    /// List installed versions, or every published one with --all.
    List(ListArgs),

    /// Delete an installed version and its SDK.
    Remove {
        /// A version such as 1.21.3 or 1.22rc1, or `main`.
        version: String,
    },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// List all versions published on go.dev.
    #[arg(short, long)]
    pub all: bool,

    /// Only list versions starting with this prefix.
    #[arg(long, value_name = "PREFIX", default_value = "")]
    pub only: String,
}
