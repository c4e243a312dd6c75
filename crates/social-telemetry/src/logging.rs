//! Structured logging.
//!
//! JSON output carries consistent fields a log shipper can index:
//! - `timestamp`, `level`, `target`
//! - `module`: owning module (users, social, activities, runtime)
//! - `correlation_id` / `kind` on every query-bus line

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` wins over `config.log_level` when both are set. Fails if a
/// global subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    if !config.console_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else if config.json_logs {
        // JSON output for containers/production
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        // Pretty output for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        json_logs = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}

/// Log with the owning module attached as a structured field.
///
/// ```rust,ignore
/// log_event!(info, "social", "Friendship created", user_a = %a, user_b = %b);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(module = $module, $($($field)*,)? $msg)
    };
    (warn, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(module = $module, $($($field)*,)? $msg)
    };
    (error, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(module = $module, $($($field)*,)? $msg)
    };
    (debug, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(module = $module, $($($field)*,)? $msg)
    };
}
