mod codes;

pub use codes::ExitCode;

use crate::api::ApiError;
use crate::export::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Fable API error: {message}")]
    Api { message: String },

    #[error("Export failed: {message}")]
    Export { message: String },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Config { .. } => ExitCode::ConfigError,
            AppError::Api { .. } => ExitCode::ApiError,
            AppError::Export { .. } => ExitCode::ExportError,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::Config { message } => {
                format!(
                    "{}\n\n\
                     Set FABLE_USER_ID and FABLE_AUTH_TOKEN in the environment or in a\n\
                     .env file in the working directory. Both values are visible in your\n\
                     browser's developer tools on requests to api.fable.co.",
                    message
                )
            }

            AppError::Api { message } => {
                format!(
                    "{}\n\n\
                     This could be due to:\n\
                     - Network connectivity issues\n\
                     - An expired authentication token\n\
                     - Changes to the Fable API\n\n\
                     Try again later or refresh your credentials.",
                    message
                )
            }

            AppError::Export { message } => {
                format!(
                    "{}\n\n\
                     Check that the output directory is writable and has free space.",
                    message
                )
            }

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingCredentials(_) => AppError::Config {
                message: err.to_string(),
            },
            _ => AppError::Api {
                message: err.to_string(),
            },
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = AppError::Config {
            message: "FABLE_USER_ID is not set".to_string(),
        };
        assert_eq!(err.exit_code(), ExitCode::ConfigError);

        let err = AppError::Api {
            message: "timeout".to_string(),
        };
        assert_eq!(err.exit_code(), ExitCode::ApiError);

        let err = AppError::Export {
            message: "No books to export".to_string(),
        };
        assert_eq!(err.exit_code(), ExitCode::ExportError);

        let err = AppError::Other("boom".to_string());
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }

    #[test]
    fn test_missing_credentials_maps_to_config_error() {
        let app_err: AppError = ApiError::MissingCredentials("FABLE_USER_ID").into();
        assert_eq!(app_err.exit_code(), ExitCode::ConfigError);
        assert!(app_err.to_string().contains("FABLE_USER_ID"));
    }

    #[test]
    fn test_api_error_conversion() {
        let app_err: AppError = ApiError::Timeout.into();
        assert_eq!(app_err.exit_code(), ExitCode::ApiError);
    }

    #[test]
    fn test_detailed_message_includes_hints() {
        let err = AppError::Config {
            message: "FABLE_AUTH_TOKEN is not set".to_string(),
        };
        let msg = err.detailed_message();
        assert!(msg.contains("FABLE_AUTH_TOKEN is not set"));
        assert!(msg.contains(".env"));
    }
}
