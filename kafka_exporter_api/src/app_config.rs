use anyhow::{bail, ensure, Context};
use config::Config;
use kafka_exporter::upstream::UpstreamSettings;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub listen: ListenConfig,
    pub upstream: UpstreamConfig,
    pub refresh: RefreshConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListenConfig {
    pub unix_socket: PathBuf,
    pub metrics_path: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub request_timeout_secs: u64,
    pub retry_delay_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl AppConfig {
    pub fn build() -> Result<Self, anyhow::Error> {
        let config = Config::builder()
            .set_default("listen.unix_socket", "/dev/shm/kafka_exporter.sock")?
            .set_default("listen.metrics_path", "/metrics")?
            .set_default("upstream.url", "http://localhost:9999")?
            .set_default("upstream.request_timeout_secs", 10)?
            .set_default("upstream.retry_delay_secs", 2)?
            .set_default("refresh.interval_secs", 120)?
            .add_source(config::File::with_name("appsettings").required(false))
            .add_source(config::Environment::with_prefix("App").separator("__"))
            .build()
            .context("While building config")?;

        let deserialized_config: AppConfig = config
            .try_deserialize()
            .context("While deserializing config")?;

        deserialized_config
            .validate()
            .context("While validating config")?;

        info!("App config: {deserialized_config:?}");

        Ok(deserialized_config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let metrics_path = &self.listen.metrics_path;
        ensure!(
            metrics_path.starts_with('/') && metrics_path != "/",
            "Metrics path {metrics_path:?} must start with '/' and differ from the landing page"
        );
        ensure!(
            !metrics_path.contains(['{', '}', '*'])
                && !metrics_path.split('/').any(|segment| segment.starts_with(':')),
            "Metrics path {metrics_path:?} must not contain route pattern characters"
        );

        let url = reqwest::Url::parse(&self.upstream.url)
            .with_context(|| format!("While parsing upstream url {}", self.upstream.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("Upstream url {} must use http or https", self.upstream.url)
        }

        ensure!(
            self.refresh.interval_secs > 0,
            "Refresh interval must be positive"
        );

        Ok(())
    }
}

impl UpstreamConfig {
    pub fn settings(&self) -> UpstreamSettings {
        UpstreamSettings {
            base_url: self.url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
