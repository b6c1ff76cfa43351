use std::env;
use std::fmt;

use crate::assessment::{
    DenominatorPolicy, ScoringConfig, UnknownDenominatorPolicy, DEFAULT_CONFIDENCE_STEP,
    MAX_CONFIDENCE,
};

/// Distinguishes runtime behavior for different stages of the tool.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let confidence_step = match env::var("APP_CONFIDENCE_STEP") {
            Ok(raw) => parse_confidence_step(&raw)?,
            Err(_) => DEFAULT_CONFIDENCE_STEP,
        };

        let denominator = match env::var("APP_DENOMINATOR_POLICY") {
            Ok(raw) => raw
                .parse::<DenominatorPolicy>()
                .map_err(|source| ConfigError::InvalidDenominatorPolicy { source })?,
            Err(_) => DenominatorPolicy::default(),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                confidence_step,
                denominator,
            },
        })
    }
}

fn parse_confidence_step(raw: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::InvalidConfidenceStep {
        value: raw.to_string(),
    };
    let step = raw.trim().parse::<u32>().map_err(|_| invalid())?;
    if (1..=MAX_CONFIDENCE).contains(&step) {
        Ok(step)
    } else {
        Err(invalid())
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidConfidenceStep { value: String },
    InvalidDenominatorPolicy { source: UnknownDenominatorPolicy },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConfidenceStep { value } => write!(
                f,
                "APP_CONFIDENCE_STEP must be an integer between 1 and {MAX_CONFIDENCE}, got '{value}'"
            ),
            ConfigError::InvalidDenominatorPolicy { source } => {
                write!(f, "APP_DENOMINATOR_POLICY is invalid: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidConfidenceStep { .. } => None,
            ConfigError::InvalidDenominatorPolicy { source } => Some(source),
        }
    }
}
