pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod metadata;
pub mod providers;
pub mod rate_provider;
pub mod service;
pub mod snapshot;

use crate::cache::RateCache;
use crate::metadata::CurrencyMetadata;
use crate::providers::open_exchange_rates::OpenExchangeRatesProvider;
use crate::service::ConversionService;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Names,
    Rates,
    Convert { from: String, to: String, amount: f64 },
}

/// Builds a `ConversionService` from configuration. Dependencies are wired
/// here once and handed to the service; nothing is looked up from ambient
/// context afterwards.
pub fn build_service(config: &config::AppConfig) -> Result<ConversionService> {
    let provider = Arc::new(OpenExchangeRatesProvider::new(
        &config.provider.base_url,
        &config.provider.app_id,
        config.fetch_timeout(),
    )?);
    let cache = RateCache::new(provider, &config.base_currency, config.refresh_interval());
    Ok(ConversionService::new(CurrencyMetadata::new(), cache))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = build_service(&config)?;

    // The CLI is a one-shot process, so bring the cache up front for the
    // commands that need live rates. Long-lived consumers rely on the
    // background refresh triggered by the read paths instead.
    match command {
        AppCommand::Names => cli::names::run(&service),
        AppCommand::Rates => {
            let spinner = cli::ui::fetch_spinner();
            service.cache().refresh_if_stale().await;
            spinner.finish_and_clear();
            cli::rates::run(&service).await
        }
        AppCommand::Convert { from, to, amount } => {
            let spinner = cli::ui::fetch_spinner();
            service.cache().refresh_if_stale().await;
            spinner.finish_and_clear();
            cli::convert::run(&service, &from, &to, amount).await
        }
    }
}
