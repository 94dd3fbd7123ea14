// Hookdesk Error Types
// Shared by storage, configuration, dispatch and workflow services

use thiserror::Error;

/// Hookdesk Error
#[derive(Error, Debug)]
pub enum HookdeskError {
    /// Underlying storage backend failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted value exists but cannot be decoded
    #[error("Corrupt value stored under '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// Value could not be serialized for storage or transport
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Webhook URL is empty or malformed
    #[error("Invalid webhook URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Workflow name not in the catalog
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// Config field name not recognised
    #[error("Unknown configuration field: {0}")]
    UnknownField(String),

    /// Config field value has the wrong shape
    #[error("Invalid value for '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },
}

/// Result type for hookdesk operations
pub type HookdeskResult<T> = Result<T, HookdeskError>;

/// Error codes for frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookdeskErrorCode {
    Storage,
    Corrupt,
    Serialization,
    InvalidUrl,
    HttpClient,
    WorkflowNotFound,
    UnknownField,
    InvalidFieldValue,
}

impl HookdeskErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookdeskErrorCode::Storage => "STORAGE_ERROR",
            HookdeskErrorCode::Corrupt => "STORAGE_CORRUPT",
            HookdeskErrorCode::Serialization => "SERIALIZATION_ERROR",
            HookdeskErrorCode::InvalidUrl => "WEBHOOK_INVALID_URL",
            HookdeskErrorCode::HttpClient => "WEBHOOK_CLIENT_ERROR",
            HookdeskErrorCode::WorkflowNotFound => "WORKFLOW_NOT_FOUND",
            HookdeskErrorCode::UnknownField => "CONFIG_UNKNOWN_FIELD",
            HookdeskErrorCode::InvalidFieldValue => "CONFIG_INVALID_VALUE",
        }
    }
}

impl HookdeskError {
    pub fn code(&self) -> HookdeskErrorCode {
        match self {
            HookdeskError::Storage(_) => HookdeskErrorCode::Storage,
            HookdeskError::Corrupt { .. } => HookdeskErrorCode::Corrupt,
            HookdeskError::Serialization(_) => HookdeskErrorCode::Serialization,
            HookdeskError::InvalidUrl { .. } => HookdeskErrorCode::InvalidUrl,
            HookdeskError::HttpClient(_) => HookdeskErrorCode::HttpClient,
            HookdeskError::WorkflowNotFound(_) => HookdeskErrorCode::WorkflowNotFound,
            HookdeskError::UnknownField(_) => HookdeskErrorCode::UnknownField,
            HookdeskError::InvalidFieldValue { .. } => HookdeskErrorCode::InvalidFieldValue,
        }
    }

    /// Convert to a user-friendly error message for the frontend
    pub fn to_user_message(&self) -> String {
        self.to_string()
    }
}

impl From<HookdeskError> for String {
    fn from(err: HookdeskError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = HookdeskError::Corrupt {
            key: "webhook_logs".to_string(),
            reason: "EOF".to_string(),
        };
        assert_eq!(err.code().as_str(), "STORAGE_CORRUPT");
        assert!(err.to_user_message().contains("webhook_logs"));
    }

    #[test]
    fn test_converts_into_command_string() {
        let err = HookdeskError::WorkflowNotFound("Launch Rockets".to_string());
        assert_eq!(err.code().as_str(), "WORKFLOW_NOT_FOUND");
        let message: String = err.into();
        assert_eq!(message, "Workflow not found: Launch Rockets");
    }
}
