//! Logging initialization for the image-inspector CLI.
//!
//! Installs a `tracing-subscriber` registry writing to stderr, so stdout only
//! carries rendered reports. `RUST_LOG` takes precedence over `--log-level`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::LogFormat;

/// Log level used when neither `RUST_LOG` nor `--log-level` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Arguments
///
/// * `log_level` - Filter directive (e.g. `info`, `image_inspector_core=debug`)
/// * `format` - JSON lines or human-readable pretty output
pub fn init_tracing(log_level: Option<&str>, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or(DEFAULT_LOG_LEVEL)))
        .map_err(|e| anyhow::anyhow!("invalid log level directive: {}", e))?;

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
    }

    Ok(())
}
