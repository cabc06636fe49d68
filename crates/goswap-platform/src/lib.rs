mod paths;
mod search_path;

pub use paths::{AppPaths, AppPathsError, ToolchainDirs};
pub use search_path::SearchPath;
