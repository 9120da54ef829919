use crate::wards::Ward;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

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
    pub data: DataConfig,
    pub capacity: CapacityConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("WARD_OPS_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir =
            PathBuf::from(env::var("WARD_OPS_DATA_DIR").unwrap_or_else(|_| ".".to_string()));
        let log_level = env::var("WARD_OPS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let capacity = CapacityConfig {
            general: read_capacity("WARD_OPS_GENERAL_BEDS", 50)?,
            icu: read_capacity("WARD_OPS_ICU_BEDS", 20)?,
            private: read_capacity("WARD_OPS_PRIVATE_BEDS", 30)?,
        };

        Ok(Self {
            environment,
            data: DataConfig { dir: data_dir },
            capacity,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn read_capacity(var: &str, default: u32) -> Result<u32, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidCapacity {
                var: var.to_string(),
                value,
            }),
        Err(_) => Ok(default),
    }
}

/// Locations of the flat files the session reads and writes.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
}

impl DataConfig {
    pub fn rates_path(&self) -> PathBuf {
        self.dir.join("rates.cfg")
    }

    pub fn patients_path(&self) -> PathBuf {
        self.dir.join("patients.csv")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.join("billing.txt")
    }

    pub fn alert_log_path(&self) -> PathBuf {
        self.dir.join("bed_alerts.log")
    }
}

/// Fixed bed totals per ward for this run.
#[derive(Debug, Clone, Copy)]
pub struct CapacityConfig {
    pub general: u32,
    pub icu: u32,
    pub private: u32,
}

impl CapacityConfig {
    pub fn as_map(&self) -> BTreeMap<Ward, u32> {
        let mut map = BTreeMap::new();
        map.insert(Ward::General, self.general);
        map.insert(Ward::Icu, self.icu);
        map.insert(Ward::Private, self.private);
        map
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidCapacity { var: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCapacity { var, value } => {
                write!(f, "{var} must be a non-negative bed count, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

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
        env::remove_var("WARD_OPS_ENV");
        env::remove_var("WARD_OPS_DATA_DIR");
        env::remove_var("WARD_OPS_LOG_LEVEL");
        env::remove_var("WARD_OPS_GENERAL_BEDS");
        env::remove_var("WARD_OPS_ICU_BEDS");
        env::remove_var("WARD_OPS_PRIVATE_BEDS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.capacity.general, 50);
        assert_eq!(config.capacity.icu, 20);
        assert_eq!(config.capacity.private, 30);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.data.rates_path(), PathBuf::from("./rates.cfg"));
    }

    #[test]
    fn capacity_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("WARD_OPS_ICU_BEDS", "8");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.capacity.icu, 8);
        assert_eq!(config.capacity.as_map()[&Ward::Icu], 8);
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_capacity() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("WARD_OPS_GENERAL_BEDS", "many");
        let err = AppConfig::load().expect_err("invalid capacity");
        assert!(matches!(err, ConfigError::InvalidCapacity { .. }));
        reset_env();
    }
}
