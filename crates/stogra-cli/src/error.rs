use thiserror::Error;

use stogra_core::{ConfigError, ServiceError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("ticker '{symbol}' not found")]
    NotFound { symbol: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ServiceError> for CliError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(error) => Self::Validation(error),
            ServiceError::NotFound { symbol } => Self::NotFound { symbol },
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::NotFound { .. } => 3,
            Self::Serialization(_) => 4,
            Self::Config(_) => 5,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_keep_their_category() {
        let not_found = CliError::from(ServiceError::NotFound {
            symbol: String::from("ZZZZ"),
        });
        assert_eq!(not_found.exit_code(), 3);
        assert_eq!(not_found.to_string(), "ticker 'ZZZZ' not found");

        let invalid = CliError::from(ServiceError::Validation(ValidationError::EmptySymbolList));
        assert_eq!(invalid.exit_code(), 2);
    }
}
