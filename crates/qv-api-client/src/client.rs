//! HTTP client for the poll backend.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared_types::{GatewayError, GatewayResult};
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Longest backend error text kept in a [`GatewayError`].
const MAX_ERROR_MESSAGE: usize = 200;

/// Backend API client.
///
/// Cheap to share behind an `Arc`; the underlying connection pool is
/// internal to `reqwest`.
pub struct BackendClient {
    http: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.parsed_base_url()?,
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint path such as `poll/7`.
    pub fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GatewayError::Decode(format!("bad endpoint {path:?}: {e}")))
    }

    /// Endpoint URL with query parameters appended in order.
    pub fn endpoint_with_query<K, V>(
        &self,
        path: &str,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> GatewayResult<Url>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.endpoint(path)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key.as_ref(), value.as_ref());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request. Non-success statuses become errors.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let response = self.send_raw(builder).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        warn!(%url, status = status.as_u16(), "backend request failed");
        Err(status_error(status, &body, url.path()))
    }

    /// Send a request and return the response whatever its status.
    pub(crate) async fn send_raw(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let started = Instant::now();
        let response = builder.send().await.map_err(transport_error)?;
        debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "backend request"
        );
        Ok(response)
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let bytes = response.bytes().await.map_err(transport_error)?;
        decode_body(&bytes)
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_decode() {
        GatewayError::Decode(err.to_string())
    } else if err.is_timeout() {
        GatewayError::Transport(format!("request timed out: {err}"))
    } else if err.is_connect() {
        GatewayError::Transport(format!("cannot connect: {err}"))
    } else {
        GatewayError::Transport(err.to_string())
    }
}

/// Map a non-success status to a gateway error.
pub fn status_error(status: StatusCode, body: &str, resource: &str) -> GatewayError {
    let message = error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    if status == StatusCode::NOT_FOUND {
        GatewayError::NotFound(format!("{resource}: {message}"))
    } else {
        GatewayError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

/// Human-readable error text from a backend error body.
///
/// Prefers a JSON `message` or `error` field and falls back to the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_owned))
        });

    let message = from_json.unwrap_or_else(|| body.to_string());
    Some(message.chars().take(MAX_ERROR_MESSAGE).collect())
}

pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> GatewayResult<T> {
    serde_json::from_slice(bytes).map_err(|e| GatewayError::Decode(e.to_string()))
}
