use thiserror::Error;

#[derive(Error, Debug)]
pub enum HunterError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HunterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HunterError::ApiError(_) => ErrorCategory::Network,
            HunterError::CsvError(_) | HunterError::SerializationError(_) => ErrorCategory::Data,
            HunterError::ConfigError { .. }
            | HunterError::InvalidConfigValueError { .. }
            | HunterError::MissingConfigError { .. } => ErrorCategory::Configuration,
            HunterError::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HunterError::ApiError(_) => {
                "Check network connectivity and the SECOP endpoint, then retry"
            }
            HunterError::CsvError(_) | HunterError::SerializationError(_) => {
                "Verify that the snapshot file is valid JSON with the expected fields"
            }
            HunterError::IoError(_) => "Check that the file exists and the path is writable",
            HunterError::ConfigError { .. }
            | HunterError::InvalidConfigValueError { .. }
            | HunterError::MissingConfigError { .. } => {
                "Review the TOML configuration file and fix the reported field"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HunterError::ApiError(_) => "Could not reach the open-data API".to_string(),
            HunterError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            HunterError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HunterError>;
