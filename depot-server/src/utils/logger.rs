//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production
//! environments:
//! - Console output (pretty in development, JSON in production)
//! - Daily rotating application logs
//! - Permanent audit logs for money-touching operations

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system with daily rotating file logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - JSON output (true for production, false for development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./work_dir/logs"))
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        // JSON format for production
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true);

        if let Some(dir) = log_dir {
            let (app_log, audit_log) = open_log_files(dir)?;

            // Application logs rotate daily
            let app_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "audit"
                }));

            // Audit logs record every order/discount mutation, never mixed
            // with application noise
            let audit_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(audit_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "audit"
                }));

            registry
                .with(console_layer)
                .with(app_layer)
                .with(audit_layer)
                .init();
        } else {
            registry.with(console_layer).init();
        }
    } else {
        // Pretty format for development
        let console_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        if let Some(dir) = log_dir {
            let (app_log, audit_log) = open_log_files(dir)?;

            let app_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "audit"
                }));

            let audit_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(audit_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "audit"
                }));

            registry
                .with(console_layer)
                .with(app_layer)
                .with(audit_layer)
                .init();
        } else {
            registry.with(console_layer).init();
        }
    }

    Ok(())
}

/// Create the log directory layout and the daily rolling appenders
fn open_log_files(dir: &str) -> anyhow::Result<(RollingFileAppender, RollingFileAppender)> {
    let log_dir = Path::new(dir);
    let app_log_dir = log_dir.join("app");
    let audit_log_dir = log_dir.join("audit");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;

    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
    let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit");
    Ok((app_log, audit_log))
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records critical business operations
///
/// Audit events land in `audit-YYYY-MM-DD.log` files, separate from
/// application logs.
///
/// # Examples
/// ```no_run
/// # use depot_server::audit_log;
/// audit_log!("admin", "approve", "order:12345");
/// audit_log!("admin", "override_status", "order:12345", "REJECTED -> PENDING (operator error)");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($user:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user = $user,
            action = $action,
            resource = $resource,
            "AUDIT"
        );
    };
    ($user:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            user = $user,
            action = $action,
            resource = $resource,
            details = $details,
            "AUDIT"
        );
    };
}
