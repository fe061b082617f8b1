use crate::engine::policy::check_rate;
use crate::engine::{MetricsPolicy, PolicyError};
use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DEMO_SEED: u64 = 42;

/// Deployment stage the service runs in.
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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    /// Tunable tables handed to the metrics engine.
    pub policy: MetricsPolicy,
    /// Seed for the synthetic listings loaded at startup and by `demo`.
    pub demo_seed: u64,
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

        let policy = load_policy()?;

        let demo_seed = match env::var("APP_DEMO_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSeed)?,
            Err(_) => DEFAULT_DEMO_SEED,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                with_target: environment != AppEnvironment::Production,
            },
            policy,
            demo_seed,
        })
    }
}

/// Policy file first, then the individual escrow overrides on top of it.
fn load_policy() -> Result<MetricsPolicy, ConfigError> {
    let mut policy = match env::var("APP_POLICY_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            let path = PathBuf::from(path.trim());
            let raw = fs::read_to_string(&path)
                .map_err(|source| ConfigError::PolicyFile { path, source })?;
            MetricsPolicy::from_json(&raw)?
        }
        _ => MetricsPolicy::default(),
    };

    if let Some(rate) = rate_override("APP_PROPERTY_TAX_RATE")? {
        policy.escrow.property_tax_rate = rate;
    }
    if let Some(rate) = rate_override("APP_INSURANCE_RATE")? {
        policy.escrow.insurance_rate = rate;
    }

    Ok(policy)
}

fn rate_override(name: &'static str) -> Result<Option<f64>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidRate { name })?;
    check_rate(name, value).map_err(|_| ConfigError::InvalidRate { name })?;
    Ok(Some(value))
}

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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub with_target: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidRate {
        name: &'static str,
    },
    InvalidSeed,
    PolicyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    Policy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRate { name } => {
                write!(f, "{name} must be a number between 0 and 1")
            }
            ConfigError::InvalidSeed => write!(f, "APP_DEMO_SEED must be a valid u64"),
            ConfigError::PolicyFile { path, .. } => {
                write!(f, "unable to read policy file {}", path.display())
            }
            ConfigError::Policy(err) => write!(f, "APP_POLICY_PATH is invalid: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidRate { .. }
            | ConfigError::InvalidSeed => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::PolicyFile { source, .. } => Some(source),
            ConfigError::Policy(err) => Some(err),
        }
    }
}

impl From<PolicyError> for ConfigError {
    fn from(value: PolicyError) -> Self {
        Self::Policy(value)
    }
}
