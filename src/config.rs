use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default exchange-rate endpoint (free tier, USD base, no API key required)
pub const DEFAULT_FX_API_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub test_before_acquire: bool,
}

/// Exchange-rate provider configuration
#[derive(Debug, Clone)]
pub struct RateProviderConfig {
    pub url: String,
    pub timeout_secs: u64,
}

/// Periodic ingestion configuration
#[derive(Debug, Clone, Default)]
pub struct SchedulerConfig {
    /// `None` disables the scheduler; the job then only runs on HTTP trigger
    pub interval_secs: Option<u64>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub rate_provider: RateProviderConfig,
    pub scheduler: SchedulerConfig,
    pub baseline_rates_path: Option<PathBuf>,
    pub log_level: String,
    pub http_port: u16,
    pub environment: String,
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is required")?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let acquire_timeout_secs = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_secs = env::var("DATABASE_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(600); // 10 minutes

        let max_lifetime_secs = env::var("DATABASE_MAX_LIFETIME_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1800); // 30 minutes

        let test_before_acquire = env::var("DATABASE_TEST_BEFORE_ACQUIRE")
            .ok()
            .and_then(|s| s.parse::<bool>().ok())
            .unwrap_or(true);

        let config = Self {
            url,
            max_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            test_before_acquire,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("DATABASE_URL must not be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if self.acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get max lifetime as Duration
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/devaluation".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            test_before_acquire: true,
        }
    }
}

impl RateProviderConfig {
    /// Create provider config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("FX_API_URL").unwrap_or_else(|_| DEFAULT_FX_API_URL.to_string());

        let timeout_secs = match env::var("FX_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("Invalid FX_API_TIMEOUT_SECS: {}", raw))?,
            Err(_) => 10,
        };

        let config = Self { url, timeout_secs };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(format!(
                "Invalid FX_API_URL: {}. Must be an http(s) URL",
                self.url
            ));
        }

        if self.timeout_secs == 0 {
            return Err("FX_API_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RateProviderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FX_API_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl SchedulerConfig {
    /// Create scheduler config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let interval_secs = match env::var("RATE_UPDATE_INTERVAL_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid RATE_UPDATE_INTERVAL_SECS: {}", raw))?;
                if secs == 0 {
                    return Err("RATE_UPDATE_INTERVAL_SECS must be greater than 0".to_string());
                }
                Some(secs)
            }
            Err(_) => None,
        };

        Ok(Self { interval_secs })
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let database = DatabaseConfig::from_env()?;
        let rate_provider = RateProviderConfig::from_env()?;
        let scheduler = SchedulerConfig::from_env()?;

        let baseline_rates_path = env::var("BASELINE_RATES_PATH").ok().map(PathBuf::from);

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            database,
            rate_provider,
            scheduler,
            baseline_rates_path,
            log_level: log_level.to_lowercase(),
            http_port,
            environment: environment.to_lowercase(),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            rate_provider: RateProviderConfig::default(),
            scheduler: SchedulerConfig::default(),
            baseline_rates_path: None,
            log_level: "info".to_string(),
            http_port: 8080,
            environment: "development".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_database_config_rejects_zero_connections() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.rate_provider.url, DEFAULT_FX_API_URL);
        assert!(config.scheduler.interval().is_none());
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
    }

    #[test]
    fn test_rate_provider_config_validation() {
        let bad_scheme = RateProviderConfig {
            url: "ftp://rates.example".to_string(),
            timeout_secs: 10,
        };
        assert!(bad_scheme.validate().is_err());

        let zero_timeout = RateProviderConfig {
            timeout_secs: 0,
            ..RateProviderConfig::default()
        };
        assert!(zero_timeout.validate().is_err());

        assert!(RateProviderConfig::default().validate().is_ok());
    }
}
