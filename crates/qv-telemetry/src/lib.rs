//! # QV Telemetry
//!
//! Structured logging for the quadratic-vote client crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qv_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_component("qv-cli");
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QV_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `QV_JSON_LOGS` | `false` | JSON lines instead of pretty output |
//! | `QV_SERVICE_NAME` | `quadratic-vote` | Service name |
//! | `NO_COLOR` | unset | Disables ANSI colors |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
