use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::matching::criteria::{CriteriaConfig, DEFAULT_EXPECTED_DEMAND};

/// Candidate count at which ranking fans scoring out to the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Distinguishes runtime behavior for different stages of the service.
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
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let expected_demand = match env::var("DSS_EXPECTED_DEMAND") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidExpectedDemand)?,
            Err(_) => DEFAULT_EXPECTED_DEMAND,
        };

        let parallel_threshold = match env::var("DSS_PARALLEL_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidParallelThreshold)?,
            Err(_) => DEFAULT_PARALLEL_THRESHOLD,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig {
                expected_demand,
                parallel_threshold,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Tunables for the matching engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingConfig {
    /// Slot count at which `slot_availability` saturates to 1.0.
    pub expected_demand: u32,
    pub parallel_threshold: usize,
}

impl MatchingConfig {
    pub fn criteria(&self) -> CriteriaConfig {
        CriteriaConfig {
            expected_demand: self.expected_demand,
            ..CriteriaConfig::default()
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            expected_demand: DEFAULT_EXPECTED_DEMAND,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidExpectedDemand,
    InvalidParallelThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidExpectedDemand => {
                write!(f, "DSS_EXPECTED_DEMAND must be a positive integer")
            }
            ConfigError::InvalidParallelThreshold => {
                write!(f, "DSS_PARALLEL_THRESHOLD must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidExpectedDemand
            | ConfigError::InvalidParallelThreshold => None,
        }
    }
}
