//! Logging initialisation
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG`, or by
//! the directive passed in when `RUST_LOG` is unset.
//!
//! ```ignore
//! tenantform_infra::observability::init_logging("tenantform=debug", LogFormat::Pretty)?;
//! tracing::info!("reconciliation started");
//! ```

use tenantform_domain::{ReconcileError, Result};
use tracing_subscriber::EnvFilter;

/// Output format of the global subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Build the filter: `RUST_LOG` when set, else `default_directive`.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            ReconcileError::Config(format!("Invalid log filter `{default_directive}`: {e}"))
        }),
    }
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `ReconcileError::Config` when the directive does not parse or a
/// global subscriber is already installed.
pub fn init_logging(default_directive: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(default_directive)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| ReconcileError::Config(format!("Logging already initialised: {e}")))
}
