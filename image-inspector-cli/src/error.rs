//! CLI-specific error types and exit code mapping

use image_inspector_core::error::{InspectorError, ValidationError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be used as given.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from image-inspector-core.
    #[error("{0}")]
    Core(#[from] InspectorError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | Output rendering error                    |
    /// | 2    | Configuration loading or validation error |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Core(inner) => match inner {
                InspectorError::Config(_) | InspectorError::Validation(_) => 2,
                InspectorError::Io(_) => 10,
            },
            Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        Self::Core(InspectorError::Validation(e))
    }
}
