use crate::approvals::{ErrorKind, LifecycleError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::validation::ValidationError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Validation(ValidationError),
    Lifecycle(LifecycleError),
    NotFound { kind: &'static str, id: String },
}

impl AppError {
    /// Process exit status for command-line callers; sysexits-style where one fits.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Validation(_) | AppError::Json(_) => 65,
            AppError::Lifecycle(err) => match err.kind() {
                ErrorKind::Validation => 65,
                ErrorKind::Authorization => 77,
                ErrorKind::StateConflict => 75,
                ErrorKind::NotFound => 66,
                ErrorKind::Unavailable => 69,
            },
            AppError::NotFound { .. } => 66,
            AppError::Io(_) | AppError::Csv(_) => 74,
            AppError::Config(_) | AppError::Telemetry(_) => 78,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid json input: {}", err),
            AppError::Csv(err) => write!(f, "csv export failed: {}", err),
            AppError::Validation(err) => write!(f, "invalid input: {}", err),
            AppError::Lifecycle(err) => write!(f, "{} error: {}", err.kind().label(), err),
            AppError::NotFound { kind, id } => write!(f, "{} '{}' not found", kind, id),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Lifecycle(err) => Some(err),
            AppError::NotFound { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<LifecycleError> for AppError {
    fn from(value: LifecycleError) -> Self {
        Self::Lifecycle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approvals::{AuthorizationError, RecordId, RecordStatus, StateConflict};
    use crate::scheduling::EmployeeId;

    #[test]
    fn lifecycle_errors_map_to_distinct_exit_codes() {
        let stale = AppError::from(LifecycleError::StateConflict(StateConflict::Stale {
            id: RecordId("w-1".to_string()),
            expected: RecordStatus::Eingereicht,
            found: RecordStatus::Genehmigt,
        }));
        assert_eq!(stale.exit_code(), 75);
        assert!(stale.to_string().starts_with("state_conflict error:"));

        let denied = AppError::from(LifecycleError::Authorization(
            AuthorizationError::NotApprover(EmployeeId("e-1".to_string())),
        ));
        assert_eq!(denied.exit_code(), 77);

        let missing = AppError::from(LifecycleError::NotFound(RecordId("w-2".to_string())));
        assert_eq!(missing.exit_code(), 66);
    }

    #[test]
    fn malformed_input_is_a_data_error() {
        let err = AppError::from(ValidationError::InvalidMonth(13));
        assert_eq!(err.exit_code(), 65);
        assert_eq!(
            err.to_string(),
            format!("invalid input: {}", ValidationError::InvalidMonth(13))
        );
    }
}
