//! Portfolio backend boundary.
//!
//! The backend speaks a loose `{success, data, ...}` envelope. It is parsed
//! here, once, into strict discriminated outcomes; nothing past this module
//! re-inspects raw response shapes.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use crate::model::NftRecord;

/// Smallest native unit per SOL.
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Failure taxonomy at the service boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Backend or proxy rejected the request for rate-limiting (429/403).
    RateLimited,
    /// The request timed out.
    Timeout,
    /// Backend responded with `success=false`, optionally with a message.
    Rejected(Option<String>),
    /// Network failure, unexpected status, or undecodable body.
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RateLimited => write!(f, "rate limited by the backend"),
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Rejected(Some(msg)) => write!(f, "rejected: {msg}"),
            ApiError::Rejected(None) => write!(f, "rejected by the backend"),
            ApiError::Transport(detail) => write!(f, "{detail}"),
        }
    }
}

/// Result of an NFT ownership query, settled at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Records(Vec<NftRecord>),
    Empty,
    Failed(ApiError),
}

/// Result of a balance query. `Sol` is already converted from lamports.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceOutcome {
    Sol(f64),
    /// Backend said success but sent no amount.
    NotFound,
    Failed(ApiError),
}

/// The injected fetch capability. `main` constructs one [`HttpPortfolio`]
/// and hands it to the fetch tasks; tests substitute scripted fakes.
#[async_trait]
pub trait PortfolioService: Send + Sync {
    async fn nfts_by_owner(&self, public_key: &str) -> FetchOutcome;
    async fn balance(&self, public_key: &str) -> BalanceOutcome;
}

// Wire envelopes. `data` as the record array and top-level `success` are
// the contract; other historical shapes are treated as transport errors.
#[derive(Debug, Deserialize)]
struct NftEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<Vec<NftRecord>>,
    #[serde(default)]
    #[allow(dead_code)]
    count: Option<usize>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalanceEnvelope {
    success: bool,
    /// Lamports.
    #[serde(default)]
    data: Option<f64>,
}

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

/// Reqwest-backed implementation of [`PortfolioService`].
pub struct HttpPortfolio {
    base_url: String,
    timeout: Duration,
    balance_retries: u32,
    retry_delay: Duration,
}

impl HttpPortfolio {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        balance_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout,
            balance_retries,
            retry_delay,
        }
    }

    async fn post(&self, path: &str, public_key: &str) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let body = serde_json::json!({ "publicKey": public_key });

        let response = http_client()
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if status.as_u16() == 429 || status.as_u16() == 403 {
            return Err(ApiError::RateLimited);
        }
        if !status.is_success() {
            return Err(ApiError::Transport(format!("server returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("undecodable response: {e}")))
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}

/// Delay before retry number `attempt` (1-based): linear in the attempt index.
pub fn retry_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(attempt)
}

/// Rate-limit, timeout, and transport failures are worth retrying; an
/// explicit `success=false` answer is definitive.
pub fn is_retryable(err: &ApiError) -> bool {
    !matches!(err, ApiError::Rejected(_))
}

#[async_trait]
impl PortfolioService for HttpPortfolio {
    async fn nfts_by_owner(&self, public_key: &str) -> FetchOutcome {
        log::info!("[api] fetching NFTs for {public_key}");

        let raw = match self.post("/nfts/get-by-owner", public_key).await {
            Ok(raw) => raw,
            Err(e) => return FetchOutcome::Failed(e),
        };

        let envelope: NftEnvelope = match serde_json::from_value(raw) {
            Ok(env) => env,
            Err(e) => {
                return FetchOutcome::Failed(ApiError::Transport(format!(
                    "unexpected response shape: {e}"
                )))
            }
        };

        if !envelope.success {
            return FetchOutcome::Failed(ApiError::Rejected(envelope.message));
        }

        let records = envelope.data.unwrap_or_default();
        log::info!("[api] fetched {} NFTs", records.len());
        if records.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Records(records)
        }
    }

    async fn balance(&self, public_key: &str) -> BalanceOutcome {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.post("/get-balance", public_key).await {
                Ok(raw) => {
                    let envelope: BalanceEnvelope = match serde_json::from_value(raw) {
                        Ok(env) => env,
                        Err(e) => {
                            return BalanceOutcome::Failed(ApiError::Transport(format!(
                                "unexpected response shape: {e}"
                            )))
                        }
                    };
                    if !envelope.success {
                        return BalanceOutcome::Failed(ApiError::Rejected(None));
                    }
                    return match envelope.data {
                        Some(lamports) => BalanceOutcome::Sol(lamports / LAMPORTS_PER_SOL),
                        None => BalanceOutcome::NotFound,
                    };
                }
                Err(e) if is_retryable(&e) && attempt < self.balance_retries => {
                    let delay = retry_delay(attempt, self.retry_delay);
                    log::warn!(
                        "[api] balance fetch failed ({e}), retry {attempt} in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return BalanceOutcome::Failed(e),
            }
        }
    }
}
