//! Client construction errors.
//!
//! Request failures are reported as [`shared_types::GatewayError`] through
//! the gateway ports; this type only covers building the client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
