use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::crm::leads::matching::MatchConfig;

/// Deployment stage, selected through `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_env() -> Self {
        match env::var("APP_ENV") {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::Development,
        }
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Runtime configuration assembled from environment variables.
///
/// A `.env` file is honored when present. Unset variables fall back to
/// development defaults; malformed values are rejected rather than silently
/// replaced.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_env();

        Ok(Self {
            environment,
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig::from_env(environment),
            matching: MatchSettings::from_env()?,
        })
    }
}

/// HTTP bind settings (`APP_HOST`, `APP_PORT`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            Err(_) => 3000,
        };

        Ok(Self { host, port })
    }

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

/// Logging controls (`APP_LOG_LEVEL`); development defaults to `debug`.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl TelemetryConfig {
    fn from_env(environment: AppEnvironment) -> Self {
        let default_level = match environment {
            AppEnvironment::Development => "debug",
            AppEnvironment::Test | AppEnvironment::Production => "info",
        };

        Self {
            log_level: env::var("APP_LOG_LEVEL").unwrap_or_else(|_| default_level.to_string()),
        }
    }
}

/// Optional overrides for the scoring rubric dials. Weight splits stay in
/// code; only the tunable thresholds are exposed through the environment.
#[derive(Debug, Clone, Default)]
pub struct MatchSettings {
    pub relevance_floor: Option<f32>,
    pub availability_decay_per_day: Option<f32>,
    pub surplus_bedroom_credit: Option<f32>,
}

impl MatchSettings {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            relevance_floor: dial("APP_RELEVANCE_FLOOR")?,
            availability_decay_per_day: dial("APP_AVAILABILITY_DECAY")?,
            surplus_bedroom_credit: dial("APP_SURPLUS_BEDROOM_CREDIT")?,
        })
    }

    /// Rubric defaults with any environment overrides applied. Range checks
    /// stay with `MatchConfig::validated`, which runs at service construction.
    pub fn rubric(&self) -> MatchConfig {
        let mut config = MatchConfig::default();
        if let Some(floor) = self.relevance_floor {
            config.relevance_floor = floor;
        }
        if let Some(decay) = self.availability_decay_per_day {
            config.availability_decay_per_day = decay;
        }
        if let Some(credit) = self.surplus_bedroom_credit {
            config.surplus_bedroom_credit = credit;
        }
        config
    }
}

fn dial(key: &'static str) -> Result<Option<f32>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidDial { key, value: raw }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { value: String },
    InvalidHost { source: std::net::AddrParseError },
    InvalidDial { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT must be a valid u16, got '{}'", value)
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDial { key, value } => {
                write!(f, "{} must be a number, got '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } | ConfigError::InvalidDial { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    // Tests that touch process environment serialize through this mutex.
    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_RELEVANCE_FLOOR",
            "APP_AVAILABILITY_DECAY",
            "APP_SURPLUS_BEDROOM_CREDIT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_development_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.matching.rubric(), MatchConfig::default());
    }

    #[test]
    fn production_environment_quiets_the_default_log_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        env::remove_var("APP_ENV");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn load_rejects_unparseable_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "crm");
        let result = AppConfig::load();
        env::remove_var("APP_PORT");
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        env::remove_var("APP_HOST");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn rubric_dials_override_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_RELEVANCE_FLOOR", "45");
        env::set_var("APP_AVAILABILITY_DECAY", "2.5");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        let rubric = config.matching.rubric();
        assert_eq!(rubric.relevance_floor, 45.0);
        assert_eq!(rubric.availability_decay_per_day, 2.5);
        assert_eq!(
            rubric.surplus_bedroom_credit,
            MatchConfig::default().surplus_bedroom_credit
        );
    }

    #[test]
    fn malformed_rubric_dial_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_RELEVANCE_FLOOR", "low");
        let result = AppConfig::load();
        reset_env();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDial {
                key: "APP_RELEVANCE_FLOOR",
                ..
            })
        ));
    }
}
