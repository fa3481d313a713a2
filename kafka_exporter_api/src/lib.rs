pub mod app_config;
pub mod metrics_api;
pub mod startup;
