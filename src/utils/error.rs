use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API responded with status {status} for {endpoint}")]
    StatusError { endpoint: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unexpected response shape for {key}: {message}")]
    ShapeError { key: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Data,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ApiError(e) if e.status().is_some() => ErrorCategory::Server,
            SiteError::ApiError(_) => ErrorCategory::Network,
            SiteError::StatusError { .. } => ErrorCategory::Server,
            SiteError::IoError(_) => ErrorCategory::Configuration,
            SiteError::SerializationError(_) | SiteError::ShapeError { .. } => ErrorCategory::Data,
            SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Server | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 沒有收到任何 HTTP 回應的失敗（斷線、廣告攔截、CORS 預檢等）。
    /// 這類錯誤屬於預期情況，不記錄為 error。
    pub fn is_connection_failure(&self) -> bool {
        match self {
            SiteError::ApiError(e) => e.status().is_none() && (e.is_connect() || e.is_request() || e.is_timeout()),
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => "Could not reach the content server".to_string(),
            ErrorCategory::Server => format!("The content server returned an error: {}", self),
            ErrorCategory::Data => "The content server returned data in an unexpected format".to_string(),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Validation => format!("Please check your input: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the api.base_url setting",
            ErrorCategory::Server => "Check that the CMS is running and the endpoint exists",
            ErrorCategory::Data => "Check that the CMS response envelope matches a known shape",
            ErrorCategory::Configuration => "Fix the configuration file or command-line arguments",
            ErrorCategory::Validation => "Correct the highlighted fields and submit again",
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
