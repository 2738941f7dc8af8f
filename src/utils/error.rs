use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid ring: {distinct_vertices} distinct vertices, at least 3 required")]
    InvalidRing { distinct_vertices: usize },

    #[error("Invalid coordinate [{lng}, {lat}]: {reason}")]
    InvalidCoordinate { lng: f64, lat: f64, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error in '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Edit session error: {message}")]
    SessionStateError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Geometry,
    Lookup,
    Input,
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

impl AdminError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn session_state(message: impl Into<String>) -> Self {
        Self::SessionStateError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRing { .. } | Self::InvalidCoordinate { .. } => ErrorCategory::Geometry,
            Self::NotFound { .. } => ErrorCategory::Lookup,
            Self::ValidationError { .. } | Self::SessionStateError { .. } => ErrorCategory::Input,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    /// 決定錯誤嚴重程度，CLI 依此決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup => ErrorSeverity::Medium,
            ErrorCategory::Geometry | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidRing { .. } => {
                "Drag the vertices apart so the zone keeps at least 3 distinct corners, or cancel the edit".to_string()
            }
            Self::InvalidCoordinate { .. } => {
                "Use longitude in [-180, 180] and latitude in [-90, 90]".to_string()
            }
            Self::NotFound { entity, .. } => {
                format!("List the available {}s and retry with an existing id", entity.to_lowercase())
            }
            Self::ValidationError { field, .. } => format!("Provide a valid value for '{}'", field),
            Self::SessionStateError { .. } => {
                "Commit or cancel the open edit before starting another one".to_string()
            }
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. } => {
                format!("Check the '{}' entry in the configuration file", field)
            }
            Self::IoError(_) => "Check that the file exists and is readable".to_string(),
            Self::SerializationError(_) => "Check that the file is valid JSON".to_string(),
            Self::CsvError(_) => "Retry with --format table or json".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidRing { .. } => {
                "The zone boundary needs at least 3 distinct points; nothing was saved".to_string()
            }
            Self::NotFound { entity, id } => format!("{} '{}' does not exist", entity, id),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failures_are_medium() {
        let err = AdminError::not_found("Zone", "zone-404");
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "Zone 'zone-404' does not exist");
    }

    #[test]
    fn test_invalid_ring_message() {
        let err = AdminError::InvalidRing { distinct_vertices: 2 };
        assert_eq!(err.category(), ErrorCategory::Geometry);
        assert!(err.to_string().contains("2 distinct vertices"));
        assert!(err.recovery_suggestion().contains("cancel"));
    }
}
