use chrono_tz::Tz;

use crate::scheduling::{BusinessHours, ClosingPolicy, SlotRules};
use crate::utils::time::parse_hhmm_or;

/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database, logs) |
/// | DATABASE_PATH | {WORK_DIR}/salon.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | TIMEZONE | Asia/Tokyo | Business timezone |
/// | LOG_LEVEL | info | Log level |
/// | LOG_JSON | false (true in production) | JSON log output |
/// | OPEN_TIME | 09:00 | Opening time |
/// | CLOSE_TIME | 19:00 | Closing time |
/// | SLOT_DURATION_MINUTES | 60 | Offered slot length |
/// | SLOT_STEP_MINUTES | 30 | Distance between slot starts |
/// | SLOT_CLOSING_POLICY | allow_overrun | allow_overrun / within_hours |
/// | FETCH_TIMEOUT_MS | 5000 | Upper bound per store read |
/// | REQUEST_TIMEOUT_MS | 30000 | Upper bound per HTTP request |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/salon HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and logs
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Business timezone; all day / week / month boundaries use it
    pub timezone: Tz,
    pub log_level: String,
    pub log_json: bool,
    pub business_hours: BusinessHours,
    pub slot_rules: SlotRules,
    pub fetch_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables, using defaults for
    /// anything unset or unparsable
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{work_dir}/salon.db"));
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|tz| match tz.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(e) => {
                    tracing::warn!("Invalid TIMEZONE '{}': {}, using Asia/Tokyo", tz, e);
                    None
                }
            })
            .unwrap_or(chrono_tz::Asia::Tokyo);

        let defaults = BusinessHours::default();
        let business_hours = BusinessHours::new(
            std::env::var("OPEN_TIME")
                .map(|v| parse_hhmm_or(&v, defaults.open))
                .unwrap_or(defaults.open),
            std::env::var("CLOSE_TIME")
                .map(|v| parse_hhmm_or(&v, defaults.close))
                .unwrap_or(defaults.close),
        );

        let rule_defaults = SlotRules::default();
        let slot_rules = SlotRules {
            duration_minutes: env_or("SLOT_DURATION_MINUTES", rule_defaults.duration_minutes),
            step_minutes: env_or("SLOT_STEP_MINUTES", rule_defaults.step_minutes),
            closing_policy: env_or::<ClosingPolicy>(
                "SLOT_CLOSING_POLICY",
                rule_defaults.closing_policy,
            ),
        };

        let is_production = environment == "production";
        Self {
            work_dir,
            database_path,
            http_port: env_or("HTTP_PORT", 3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", is_production),
            environment,
            timezone,
            business_hours,
            slot_rules,
            fetch_timeout_ms: env_or("FETCH_TIMEOUT_MS", 5000),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30000),
        }
    }

    /// Override the locations, keeping everything else from the environment
    ///
    /// Mostly used in tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = format!("{}/salon.db", config.work_dir);
        config.http_port = http_port;
        config
    }

    /// Log directory under the working directory
    pub fn log_dir(&self) -> String {
        format!("{}/logs", self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    /// Built-in defaults, ignoring the environment
    fn default() -> Self {
        Self {
            work_dir: "./data".into(),
            database_path: "./data/salon.db".into(),
            http_port: 3000,
            environment: "development".into(),
            timezone: chrono_tz::Asia::Tokyo,
            log_level: "info".into(),
            log_json: false,
            business_hours: BusinessHours::default(),
            slot_rules: SlotRules::default(),
            fetch_timeout_ms: 5000,
            request_timeout_ms: 30000,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_salon_hours() {
        let config = Config::default();
        assert_eq!(config.timezone, chrono_tz::Asia::Tokyo);
        assert_eq!(config.business_hours, BusinessHours::default());
        assert_eq!(config.slot_rules.duration_minutes, 60);
        assert_eq!(config.slot_rules.step_minutes, 30);
        assert_eq!(config.slot_rules.closing_policy, ClosingPolicy::AllowOverrun);
        assert_eq!(config.log_dir(), "./data/logs");
        assert!(config.is_development());
    }

    #[test]
    fn env_or_falls_back_on_garbage() {
        assert_eq!(env_or("SALON_TEST_UNSET_VARIABLE", 42u64), 42);
    }
}
