use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    #[error("malformed version {version:?}")]
    MalformedVersion { version: String },

    #[error("{version} is not installed")]
    NotInstalled { version: String },

    #[error("unable to remove {version} (main)")]
    CannotRemoveMain { version: String },

    #[error("unexpected format {output:?}")]
    UnexpectedOutput { output: String },

    #[error("{program} failed: {details}")]
    CommandFailed { program: String, details: String },

    #[error("Installation failed during {phase}: {details}")]
    InstallFailed {
        phase: &'static str,
        details: String,
    },

    #[error("Network error during {operation} ({stage}): {details}")]
    Network {
        operation: &'static str,
        stage: NetworkStage,
        details: String,
    },

    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("operation cancelled")]
    Cancelled,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    #[error("request")]
    Request,
    #[error("response parse")]
    ResponseParse,
}

/// Coarse grouping of [`SwitchError`] variants.
///
/// Argument problems never reach this type; the command-line parser rejects
/// them before any state is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    StateConflict,
    Io,
    Format,
}

impl SwitchError {
    pub fn malformed(version: impl Into<String>) -> Self {
        Self::MalformedVersion {
            version: version.into(),
        }
    }

    pub fn install_failed(phase: &'static str, details: impl Into<String>) -> Self {
        Self::InstallFailed {
            phase,
            details: details.into(),
        }
    }

    pub fn network_request(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Network {
            operation,
            stage: NetworkStage::Request,
            details: details.into(),
        }
    }

    pub fn network_request_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_request(operation, error.to_string())
    }

    pub fn network_parse(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Network {
            operation,
            stage: NetworkStage::ResponseParse,
            details: details.into(),
        }
    }

    pub fn network_parse_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_parse(operation, error.to_string())
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedVersion { .. } => ErrorCategory::Validation,
            Self::NotInstalled { .. } | Self::CannotRemoveMain { .. } => {
                ErrorCategory::StateConflict
            }
            Self::UnexpectedOutput { .. }
            | Self::Network {
                stage: NetworkStage::ResponseParse,
                ..
            } => ErrorCategory::Format,
            Self::CommandFailed { .. }
            | Self::InstallFailed { .. }
            | Self::Network { .. }
            | Self::Io { .. }
            | Self::Cancelled => ErrorCategory::Io,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { kind, .. } if *kind == std::io::ErrorKind::NotFound)
    }
}

impl From<std::io::Error> for SwitchError {
    fn from(err: std::io::Error) -> Self {
        SwitchError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
