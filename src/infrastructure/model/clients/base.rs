//! Base HTTP client with shared logic

use crate::infrastructure::model::types::ModelError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(8);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    pub max_retries: u32,
    pub http: Client,
}

struct AttemptFailure {
    error: ModelError,
    retry_after: Option<Duration>,
}

impl From<ModelError> for AttemptFailure {
    fn from(error: ModelError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

impl HttpClientBase {
    pub fn new(
        id: String,
        endpoint: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ModelError::Client {
                provider: id.clone(),
                source,
            })?;
        Ok(Self {
            id,
            endpoint,
            max_retries,
            http,
        })
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with extra headers and query parameters, retrying transient
    /// failures up to `max_retries` times.
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let mut attempt = 0u32;
        loop {
            match self.post_once(url, headers, query, body).await {
                Ok(value) => return Ok(value),
                Err(failure) if attempt < self.max_retries && failure.error.is_retryable() => {
                    let delay = failure
                        .retry_after
                        .unwrap_or_else(|| backoff_delay(attempt));
                    attempt += 1;
                    warn!(
                        provider = self.id.as_str(),
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure.error,
                        "Retrying model request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn post_once<Req, Res>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
        body: &Req,
    ) -> Result<Res, AttemptFailure>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let mut request = self.http.post(url).query(query).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after(&response);
            let body = response.text().await.unwrap_or_default();
            debug!(provider = self.id.as_str(), %status, "Model request failed");
            return Err(AttemptFailure {
                error: ModelError::status(&self.id, status, body),
                retry_after,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(&self.id, e.to_string()).into())
    }
}

/// Exponential backoff: 0.5s, 1s, 2s, ... capped at 8s.
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.min(16));
    INITIAL_RETRY_DELAY
        .saturating_mul(factor)
        .min(MAX_RETRY_DELAY)
}

fn retry_after(response: &Response) -> Option<Duration> {
    let value = response.headers().get(RETRY_AFTER)?.to_str().ok()?;
    parse_retry_after(value)
}

/// Seconds form of `Retry-After`, capped at 60s.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(
        seconds.min(MAX_RETRY_AFTER.as_secs_f64()),
    ))
}
