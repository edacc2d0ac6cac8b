use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use crate::provider::HeliusClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub helius_api_url: String,
    pub helius_api_key: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub log_dir: String,

    // Fetch settings
    pub fetch_limit: usize,
    pub reduced_fetch_limit: usize,
    pub launch_max_pages: usize,
    pub recent_max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            helius_api_url: "https://api.helius.xyz".to_string(),
            helius_api_key: None,
            telegram_bot_token: None,
            telegram_chat_id: None,
            log_dir: "./logs".to_string(),
            fetch_limit: 100,
            reduced_fetch_limit: 25,
            launch_max_pages: 10,
            recent_max_pages: 1,
        }
    }
}

pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    // Override defaults with environment variables
    if let Ok(api_url) = env::var("HELIUS_API_URL") {
        config.helius_api_url = api_url;
    }

    if let Ok(api_key) = env::var("HELIUS_API_KEY") {
        config.helius_api_key = Some(api_key);
    }

    if let Ok(telegram_bot_token) = env::var("TELEGRAM_BOT_TOKEN") {
        config.telegram_bot_token = Some(telegram_bot_token);
    }

    if let Ok(telegram_chat_id) = env::var("TELEGRAM_CHAT_ID") {
        config.telegram_chat_id = Some(telegram_chat_id);
    }

    if let Ok(log_dir) = env::var("LOG_DIR") {
        config.log_dir = log_dir;
    }

    if let Ok(limit) = env::var("FETCH_LIMIT") {
        config.fetch_limit = limit.parse().context("FETCH_LIMIT must be a number")?;
    }

    if let Ok(limit) = env::var("REDUCED_FETCH_LIMIT") {
        config.reduced_fetch_limit = limit
            .parse()
            .context("REDUCED_FETCH_LIMIT must be a number")?;
    }

    if let Ok(pages) = env::var("LAUNCH_MAX_PAGES") {
        config.launch_max_pages = pages.parse().context("LAUNCH_MAX_PAGES must be a number")?;
    }

    if let Ok(pages) = env::var("RECENT_MAX_PAGES") {
        config.recent_max_pages = pages.parse().context("RECENT_MAX_PAGES must be a number")?;
    }

    Ok(config)
}

/// Sanity-checks the configuration: reports which credentials are
/// present and probes the indexer endpoint when a key is set.
pub async fn initialize_config() -> Result<()> {
    info!("Checking bundlecheck configuration...");

    let config = load_config()?;

    match &config.helius_api_key {
        Some(_) => {
            info!("Indexer endpoint: {}", config.helius_api_url);
            let client = HeliusClient::new(&config)?;
            match client.check_connection().await {
                Ok(()) => info!("Indexer connection OK"),
                Err(e) => warn!("Could not reach the indexer: {}", e),
            }
        }
        None => warn!("HELIUS_API_KEY is not set; `analyze` will fail until it is"),
    }

    if config.telegram_bot_token.is_some() && config.telegram_chat_id.is_some() {
        info!("Telegram alerts enabled");
    } else {
        info!("Telegram alerts disabled (bot token or chat ID not configured)");
    }

    info!("Configuration check complete");
    Ok(())
}
