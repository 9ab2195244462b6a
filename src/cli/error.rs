//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::ResponseNotFound(_) => crate::exitcode::NOINPUT,
                ApplicationError::Parse { .. } | ApplicationError::Scalar(_) => {
                    crate::exitcode::DATAERR
                }
                ApplicationError::InvalidPath { .. } => crate::exitcode::USAGE,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScalarError;
    use std::path::PathBuf;

    #[test]
    fn given_missing_response_when_mapping_then_noinput() {
        let err = CliError::from(ApplicationError::ResponseNotFound(PathBuf::from("x.json")));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_absent_scalar_when_mapping_then_dataerr() {
        let err = CliError::from(ApplicationError::from(ScalarError::Absent));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "value is absent");
    }

    #[test]
    fn given_usage_error_when_mapping_then_usage() {
        let err = CliError::Usage("no property 'age' at me".into());
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
