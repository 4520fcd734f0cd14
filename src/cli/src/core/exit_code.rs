use crate::core::error::MnkyError;

/// Exit codes for the mnky CLI
/// Following standard Unix/POSIX conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General/unspecified error
    GeneralError = 1,
    /// Invalid document or arguments
    ConfigError = 3,
    /// File not found or IO error
    FileError = 4,
    /// Configuration not found
    NotFoundError = 5,
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<&MnkyError> for ExitCode {
    fn from(error: &MnkyError) -> Self {
        match error {
            MnkyError::Io(_) => ExitCode::FileError,
            MnkyError::Document(_) => ExitCode::ConfigError,
            MnkyError::Validation(_) => ExitCode::ConfigError,
            MnkyError::DirectoryNotFound(_) => ExitCode::FileError,
            MnkyError::ConfigurationNotFound(_) => ExitCode::NotFoundError,
            MnkyError::Generic(_) => ExitCode::GeneralError,
        }
    }
}
