use thiserror::Error;

use goswap_backend::SwitchError;
use goswap_platform::AppPathsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Switch(#[from] SwitchError),

    #[error(transparent)]
    Paths(#[from] AppPathsError),
}
