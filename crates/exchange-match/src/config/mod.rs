use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::matching::redirect::AffiliateDirectory;
use crate::matching::scoring::{ScoringConfig, ScoringConfigError};
use crate::matching::service::DEFAULT_REDIRECT_FALLBACK;

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
    pub catalog: CatalogConfig,
    pub redirect: RedirectConfig,
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

        let path = env::var("APP_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/providers.json"));
        let scoring_path = env::var("APP_SCORING_CONFIG").ok().map(PathBuf::from);
        let top_n = match env::var("APP_TOP_N") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidTopN)?,
            ),
            Err(_) => None,
        };

        let fallback = env::var("APP_REDIRECT_FALLBACK")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REDIRECT_FALLBACK.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig {
                path,
                scoring_path,
                top_n,
            },
            redirect: RedirectConfig {
                fallback,
                affiliates: AffiliateDirectory::from_env(),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the provider dataset and optional scoring overrides.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub scoring_path: Option<PathBuf>,
    pub top_n: Option<usize>,
}

impl CatalogConfig {
    /// Defaults, then the scoring file, then the `APP_TOP_N` override.
    pub fn scoring(&self) -> Result<ScoringConfig, ConfigError> {
        let mut scoring = match &self.scoring_path {
            Some(path) => ScoringConfig::from_path(path).map_err(ConfigError::Scoring)?,
            None => ScoringConfig::default(),
        };
        if let Some(top_n) = self.top_n {
            scoring.top_n = top_n;
        }
        Ok(scoring)
    }
}

/// Outbound partner links and the safe landing page used when one is missing.
#[derive(Debug, Clone)]
pub struct RedirectConfig {
    pub fallback: String,
    pub affiliates: AffiliateDirectory,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTopN,
    Scoring(ScoringConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTopN => write!(f, "APP_TOP_N must be a non-negative integer"),
            ConfigError::Scoring(err) => write!(f, "APP_SCORING_CONFIG is unusable: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTopN => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Scoring(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_CATALOG_PATH");
        env::remove_var("APP_SCORING_CONFIG");
        env::remove_var("APP_TOP_N");
        env::remove_var("APP_REDIRECT_FALLBACK");
        env::remove_var("AFFILIATE_COINSPOT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.catalog.path, PathBuf::from("data/providers.json"));
        assert!(config.catalog.scoring_path.is_none());
        assert_eq!(config.redirect.fallback, "/");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn top_n_override_applies_over_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_TOP_N", "5");
        let config = AppConfig::load().expect("config loads");
        let scoring = config.catalog.scoring().expect("scoring resolves");
        assert_eq!(scoring.top_n, 5);
        env::remove_var("APP_TOP_N");
    }

    #[test]
    fn rejects_non_numeric_top_n() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_TOP_N", "three");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidTopN)));
        env::remove_var("APP_TOP_N");
    }

    #[test]
    fn collects_affiliate_urls_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AFFILIATE_COINSPOT", "https://partners.example/coinspot");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.redirect.affiliates.resolve("coinspot"),
            Some("https://partners.example/coinspot")
        );
        env::remove_var("AFFILIATE_COINSPOT");
    }
}
