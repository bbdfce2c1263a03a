use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use url::Url;

/// Path of the prediction endpoint on the scoring service.
pub const PREDICT_PATH: &str = "/api/predict";

const DEFAULT_SCORING_BASE_URL: &str = "http://127.0.0.1:5328";

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

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
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

        let scoring = ScoringConfig::from_base(
            &env::var("SCORING_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SCORING_BASE_URL.to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring,
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

/// Location of the external scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub base_url: Url,
}

impl ScoringConfig {
    pub fn from_base(raw: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidScoringUrl {
            value: raw.to_string(),
            source: Some(source),
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidScoringUrl {
                value: raw.to_string(),
                source: None,
            });
        }
        Ok(Self { base_url })
    }

    /// Absolute URL of the predict endpoint. Any path on the base is replaced.
    pub fn predict_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(PREDICT_PATH);
        url.set_query(None);
        url
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidScoringUrl {
        value: String,
        source: Option<url::ParseError>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be an IP address or 'localhost'")
            }
            ConfigError::InvalidScoringUrl { value, .. } => {
                write!(f, "SCORING_BASE_URL '{value}' is not an absolute http(s) URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidScoringUrl { source, .. } => {
                source.as_ref().map(|err| err as &(dyn std::error::Error + 'static))
            }
        }
    }
}
