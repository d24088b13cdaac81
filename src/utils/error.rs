use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{operation} returned HTTP {status}: {body}")]
    ApiStatusError {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {operation}: {message}")]
    UnexpectedResponseError { operation: String, message: String },

    #[error("Fixture not found: {path}")]
    FixtureNotFoundError { path: String },

    #[error("Invalid fixture path '{path}': {reason}")]
    InvalidFixturePathError { path: String, reason: String },

    #[error("Malformed JSON in {context}: {source}")]
    MalformedJsonError {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fixture,
    Api,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SuiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SuiteError::FixtureNotFoundError { .. }
            | SuiteError::InvalidFixturePathError { .. }
            | SuiteError::MalformedJsonError { .. } => ErrorCategory::Fixture,
            SuiteError::ApiError(_)
            | SuiteError::ApiStatusError { .. }
            | SuiteError::UnexpectedResponseError { .. } => ErrorCategory::Api,
            SuiteError::ConfigError { .. }
            | SuiteError::ConfigValidationError { .. }
            | SuiteError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SuiteError::IoError(_) | SuiteError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Api => ErrorSeverity::Medium,
            ErrorCategory::Fixture | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Exit code used by the CLI when this error aborts a command.
    pub fn exit_code(&self) -> u8 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Fixture => "Check that the fixture exists under the data directory",
            ErrorCategory::Api => "Check network access and the configured base URL",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, SuiteError>;
