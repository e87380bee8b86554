use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::decode::decode_body;
use crate::limiter::FetchLimiter;
use crate::{FailureKind, FetchError, TransportResponse};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; CampScraper/1.0)";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Per attempt.
    pub request_timeout: Duration,
    pub max_attempts: u32,
    /// Delay before retry `k` (0-based) is `backoff_base * 2^k`.
    pub backoff_base: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchSettings {
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// One HTTP GET, no retries. Implementations report every received status as
/// a response and reserve `Err` for failures to get one.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestTransport {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(TransportResponse::new(status, String::new()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_body(&bytes, content_type.as_deref());
        if decoded.had_errors {
            engine_debug!(
                "Lossy decode url={} encoding={}",
                url,
                decoded.encoding_label
            );
        }
        Ok(TransportResponse::new(status, decoded.text))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

/// Bounded, retried GET on top of a [`Transport`].
///
/// Each attempt holds one limiter permit for the duration of the transport
/// call only; backoff sleeps happen with the permit released.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    limiter: FetchLimiter,
    settings: FetchSettings,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: FetchLimiter,
        settings: FetchSettings,
    ) -> Self {
        Self {
            transport,
            limiter,
            settings,
        }
    }

    /// Returns the body of the first 2xx answer, or the last failure once a
    /// non-retryable failure occurs or attempts run out.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let attempts = self.settings.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            let outcome = {
                let _permit = self.limiter.acquire().await?;
                self.transport.get(url).await
            };

            let error = match outcome {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => FetchError::new(
                    FailureKind::HttpStatus(response.status),
                    format!("status {}", response.status),
                ),
                Err(err) => err,
            };

            if !error.is_retryable() {
                engine_debug!("Fetch failed url={} error={} (not retried)", url, error);
                return Err(error);
            }

            if attempt + 1 < attempts {
                let delay = self.settings.backoff_delay(attempt);
                engine_debug!(
                    "Fetch attempt {} failed url={} error={} retry_in={:?}",
                    attempt + 1,
                    url,
                    error,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            last_error = Some(error);
        }

        let last_error =
            last_error.unwrap_or_else(|| FetchError::new(FailureKind::Network, "no attempt made"));
        engine_warn!(
            "Fetch gave up url={} attempts={} error={}",
            url,
            attempts,
            last_error
        );
        Err(last_error)
    }
}
