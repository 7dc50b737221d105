use std::env;
use std::fmt;

use crate::approvals::ApprovalPolicy;
use crate::scheduling::DEFAULT_STANDBY_SERVICE_KEY;

const DEFAULT_APPROVER_ROLES: &str = "Primararzt,1. Oberarzt";

/// Distinguishes runtime behavior for different stages of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the engine and its command-line front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub approvals: ApprovalConfig,
    pub scheduling: SchedulingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let approver_roles: Vec<String> = env::var("APP_APPROVER_ROLES")
            .unwrap_or_else(|_| DEFAULT_APPROVER_ROLES.to_string())
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        if approver_roles.is_empty() {
            return Err(ConfigError::EmptyApproverRoles);
        }

        let standby_service_key = env::var("APP_STANDBY_SERVICE_KEY")
            .unwrap_or_else(|_| DEFAULT_STANDBY_SERVICE_KEY.to_string())
            .trim()
            .to_string();
        if standby_service_key.is_empty() {
            return Err(ConfigError::BlankStandbyKey);
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            approvals: ApprovalConfig { approver_roles },
            scheduling: SchedulingConfig {
                standby_service_key,
            },
        })
    }

    pub fn approval_policy(&self) -> ApprovalPolicy {
        ApprovalPolicy::from_labels(&self.approvals.approver_roles)
    }
}

/// Role labels whose holders may approve or reject submitted records.
#[derive(Debug, Clone)]
pub struct ApprovalConfig {
    pub approver_roles: Vec<String>,
}

/// Service-line settings shared by the resolvers.
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    pub standby_service_key: String,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyApproverRoles,
    BlankStandbyKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyApproverRoles => {
                write!(f, "APP_APPROVER_ROLES must name at least one role")
            }
            ConfigError::BlankStandbyKey => {
                write!(f, "APP_STANDBY_SERVICE_KEY must not be blank")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
