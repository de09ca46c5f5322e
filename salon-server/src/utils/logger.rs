//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - Console output (pretty or JSON)
//! - Daily rotating application logs (deleted after 14 days)
//! - Daily rotating audit logs (never deleted)

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{Metadata, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt, prelude::*};

/// Application logs older than this are removed by [`cleanup_old_logs`]
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Target used by the `audit_log!` macro
pub const AUDIT_TARGET: &str = "audit";

fn is_audit(meta: &Metadata<'_>) -> bool {
    meta.target() == AUDIT_TARGET
}

fn is_not_audit(meta: &Metadata<'_>) -> bool {
    meta.target() != AUDIT_TARGET
}

/// Daily rotating file layer restricted by `keep`
fn file_layer<S>(
    dir: &Path,
    prefix: &str,
    json_format: bool,
    keep: fn(&Metadata<'_>) -> bool,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, prefix);
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(appender)
            .with_filter(filter::filter_fn(keep))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(appender)
            .with_filter(filter::filter_fn(keep))
            .boxed()
    }
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - JSON output (production) instead of pretty output (development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./work_dir/logs"))
///
/// Must be called from within a tokio runtime when `log_dir` is set, since
/// the retention cleanup runs as a background task.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let (app_layer, audit_layer) = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            let app_log_dir = log_dir.join("app");
            let audit_log_dir = log_dir.join("audit");
            fs::create_dir_all(&app_log_dir)?;
            fs::create_dir_all(&audit_log_dir)?;

            tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));

            (
                Some(file_layer(&app_log_dir, "app", json_format, is_not_audit)),
                Some(file_layer(&audit_log_dir, "audit", json_format, is_audit)),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(app_layer)
        .with(audit_layer)
        .try_init()?;

    Ok(())
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Clean up application log files older than [`APP_LOG_RETENTION_DAYS`]
///
/// Rolled files are named `app.YYYY-MM-DD` (UTC date). Audit logs are kept.
/// Returns the number of deleted files.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = chrono::Utc::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut deleted = 0;

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = name
            .strip_prefix("app.")
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        if date < cutoff {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            deleted += 1;
        }
    }

    Ok(deleted)
}

/// Periodic cleanup task - runs every hour
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}

/// Audit log helper - records changes to business records
///
/// Audit entries go to `audit/audit.YYYY-MM-DD` and are never deleted.
///
/// # Examples
/// ```ignore
/// audit_log!("create", "appointment", appointment.id);
/// audit_log!("update", "sales_record", id, format!("status -> {:?}", status));
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr, $resource_id:expr) => {
        tracing::info!(
            target: "audit",
            action = $action,
            resource = $resource,
            resource_id = %$resource_id,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($action:expr, $resource:expr, $resource_id:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            action = $action,
            resource = $resource,
            resource_id = %$resource_id,
            details = %$details,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("app");
        fs::create_dir_all(&app_dir).unwrap();

        let today = chrono::Utc::now().date_naive();
        let old = today - chrono::Duration::days(APP_LOG_RETENTION_DAYS + 3);
        let old_file = app_dir.join(format!("app.{}", old.format("%Y-%m-%d")));
        let fresh_file = app_dir.join(format!("app.{}", today.format("%Y-%m-%d")));
        let unrelated = app_dir.join("notes.txt");
        for f in [&old_file, &fresh_file, &unrelated] {
            fs::write(f, "x").unwrap();
        }

        let deleted = cleanup_old_logs(dir.path()).unwrap();
        assert_eq!(deleted, 1);
        assert!(!old_file.exists());
        assert!(fresh_file.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn cleanup_without_app_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
    }
}
