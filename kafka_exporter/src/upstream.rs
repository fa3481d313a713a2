use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Source of raw KafkaOffsetMonitor responses.
///
/// `fetch` resolves to the response body, or to an error when the call failed
/// after its retry budget. Error-status bodies are never returned.
pub trait Upstream: Send + Sync {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, anyhow::Error>> + Send;
}

impl<U: Upstream> Upstream for Arc<U> {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, anyhow::Error>> + Send {
        (**self).fetch(path)
    }
}

impl<U: Upstream> Upstream for &U {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, anyhow::Error>> + Send {
        (**self).fetch(path)
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub retry_delay: Duration,
}

impl UpstreamSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// HTTP client for KafkaOffsetMonitor. Every failed call is retried exactly
/// once after `retry_delay`.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    retry_delay: Duration,
}

impl UpstreamClient {
    pub fn new(settings: UpstreamSettings) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("While building upstream http client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            retry_delay: settings.retry_delay,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_once(&self, url: &str) -> Result<String, anyhow::Error> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .context("While sending upstream request")?
            .error_for_status()
            .context("While checking upstream response status")?
            .text()
            .await
            .context("While reading upstream response body")?;

        Ok(body)
    }
}

impl Upstream for UpstreamClient {
    async fn fetch(&self, path: &str) -> Result<String, anyhow::Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");

        match self.get_once(&url).await {
            Ok(body) => return Ok(body),
            Err(e) => warn!(
                "Upstream request {url} failed, retrying in {:?}\n{e:?}",
                self.retry_delay
            ),
        }

        tokio::time::sleep(self.retry_delay).await;

        self.get_once(&url)
            .await
            .with_context(|| format!("While retrying upstream request {url}"))
    }
}
