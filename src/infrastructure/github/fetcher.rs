use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use crate::infrastructure::github::link::next_link;
use crate::ports::github::{FetchOutcome, FetchStatus, PaginatedFetchPort};
use crate::shared::config::GitHubConfig;
use crate::shared::error::FeedError;
use crate::shared::result::Result;

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// 单页请求失败的原因
#[derive(Debug, thiserror::Error)]
enum PageError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("invalid body: {0}")]
    Body(String),
}

impl PageError {
    fn is_retryable(&self) -> bool {
        match self {
            PageError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PageError::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            PageError::Body(_) => false,
        }
    }
}

struct Page {
    items: Vec<Value>,
    next: Option<String>,
}

/// 重试策略：指数退避
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// 基于 `Link` 头的分页抓取器
pub struct PaginatedFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
    page_delay: Duration,
}

impl PaginatedFetcher {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).map_err(|e| FeedError::Config(e.to_string()))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ghfeed/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FeedError::Config(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                initial_backoff: Duration::from_millis(config.retry_backoff_ms),
            },
            page_delay: Duration::from_millis(config.page_delay_ms),
        })
    }

    async fn fetch_page(&self, url: &Url) -> std::result::Result<Page, PageError> {
        let mut attempt = 0;
        loop {
            match self.request_page(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.backoff(attempt);
                    warn!("Request to {} failed ({}), retrying in {:?}", url, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn request_page(&self, url: &Url) -> std::result::Result<Page, PageError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Status(status));
        }

        if let Some(remaining) = response
            .headers()
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
        {
            debug!("GitHub rate limit remaining: {}", remaining);
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(next_link);

        match response.json::<Value>().await? {
            Value::Array(items) => Ok(Page { items, next }),
            other => Err(PageError::Body(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl PaginatedFetchPort for PaginatedFetcher {
    async fn fetch_all(&self, url: Url) -> FetchOutcome {
        let mut items = Vec::new();
        let mut pages = 0;
        let mut seen = HashSet::from([url.clone()]);
        let mut current = url;

        let status = loop {
            let page = match self.fetch_page(&current).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Pagination stopped at {} after {} page(s): {}", current, pages, e);
                    break FetchStatus::Partial {
                        failed_url: current.to_string(),
                        reason: e.to_string(),
                    };
                }
            };

            pages += 1;
            items.extend(page.items);

            let Some(next) = page.next else {
                break FetchStatus::Complete;
            };

            current = match current.join(&next) {
                Ok(u) => u,
                Err(e) => {
                    warn!("Invalid next link {}: {}", next, e);
                    break FetchStatus::Partial {
                        failed_url: next,
                        reason: e.to_string(),
                    };
                }
            };

            // 服务端返回重复的 next 链接时停止，避免无限翻页
            if !seen.insert(current.clone()) {
                warn!("Next link {} was already fetched, stopping after {} page(s)", current, pages);
                break FetchStatus::Partial {
                    failed_url: current.to_string(),
                    reason: "pagination loop: next link points to an already fetched page".into(),
                };
            }

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        };

        debug!("Fetched {} item(s) in {} page(s)", items.len(), pages);
        FetchOutcome { items, pages, status }
    }
}
