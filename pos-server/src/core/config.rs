use chrono_tz::Tz;
use std::path::PathBuf;

const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Costa_Rica;

/// POS configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Database, logs and exports live here |
/// | DB_FILE | pos.redb | Database file name inside WORK_DIR |
/// | LOG_LEVEL | info | tracing filter when RUST_LOG is unset |
/// | LOG_DIR | (unset) | Enables daily rolling log files |
/// | EXPORT_DIR | WORK_DIR/exports | Where sales exports are written |
/// | RECENT_SALES_LIMIT | 50 | Size of the recent-sales feed |
/// | CLOSE_ORDER_MAX_RETRIES | 3 | Retries after a close-order conflict |
/// | BUSINESS_TIMEZONE | America/Costa_Rica | Zone for "today" and export timestamps |
/// | MENU_IMPORT_PATH | (unset) | CSV that replaces the menu at startup |
/// | ENVIRONMENT | development | development / production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/pos LOG_DIR=/srv/pos/logs cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub db_file: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub export_dir: Option<String>,
    pub recent_sales_limit: usize,
    pub close_order_max_retries: u32,
    pub business_timezone: Tz,
    pub menu_import_path: Option<String>,
    /// development | production
    pub environment: String,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let business_timezone = match env_opt("BUSINESS_TIMEZONE") {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(timezone = %name, "Unknown BUSINESS_TIMEZONE, using default");
                DEFAULT_TIMEZONE
            }),
            None => DEFAULT_TIMEZONE,
        };

        Self {
            work_dir: env_opt("WORK_DIR").unwrap_or_else(|| "./data".into()),
            db_file: env_opt("DB_FILE").unwrap_or_else(|| "pos.redb".into()),
            log_level: env_opt("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: env_opt("LOG_DIR"),
            export_dir: env_opt("EXPORT_DIR"),
            recent_sales_limit: env_opt("RECENT_SALES_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            close_order_max_retries: env_opt("CLOSE_ORDER_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            business_timezone,
            menu_import_path: env_opt("MENU_IMPORT_PATH"),
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// Override the working directory
    ///
    /// Mostly for tests
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.export_dir = None;
        config.menu_import_path = None;
        config
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.db_file)
    }

    pub fn export_path(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.work_dir).join("exports"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_paths() {
        let config = Config::with_overrides("/tmp/pos-test");

        assert_eq!(config.work_dir, "/tmp/pos-test");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/pos-test").join(&config.db_file));
        assert_eq!(config.export_path(), PathBuf::from("/tmp/pos-test/exports"));
        assert!(config.menu_import_path.is_none());
    }

    #[test]
    fn test_default_timezone_parses() {
        let tz: Tz = "America/Costa_Rica".parse().unwrap();
        assert_eq!(tz, DEFAULT_TIMEZONE);
    }
}
