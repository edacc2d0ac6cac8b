use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{BundleCheckError, Result};

use super::{FetchPeriod, TokenTransfer, TransferProvider, UNKNOWN_WALLET};

/// One entry of the enhanced-transactions response. Only the fields the
/// analyzer needs are decoded; the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
struct EnhancedTransaction {
    signature: String,
    /// Block time in seconds. Missing for transactions the indexer has
    /// not resolved a block time for.
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    slot: u64,
    #[serde(default, rename = "tokenTransfers")]
    token_transfers: Vec<RawTokenTransfer>,
}

#[derive(Debug, Deserialize)]
struct RawTokenTransfer {
    #[serde(default, rename = "fromUserAccount")]
    from_user_account: Option<String>,
    #[serde(default, rename = "toUserAccount")]
    to_user_account: Option<String>,
    #[serde(default, rename = "tokenAmount")]
    token_amount: f64,
    mint: String,
}

/// Transfer history client for a Helius-style enhanced-transactions API.
pub struct HeliusClient {
    client: Client,
    base_url: String,
    api_key: String,
    fetch_limit: usize,
    reduced_fetch_limit: usize,
    launch_max_pages: usize,
    recent_max_pages: usize,
}

impl HeliusClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .helius_api_key
            .clone()
            .ok_or_else(|| BundleCheckError::config_error("HELIUS_API_KEY is not set"))?;

        Ok(Self {
            client: Client::new(),
            base_url: config.helius_api_url.trim_end_matches('/').to_string(),
            api_key,
            fetch_limit: config.fetch_limit,
            reduced_fetch_limit: config.reduced_fetch_limit,
            launch_max_pages: config.launch_max_pages,
            recent_max_pages: config.recent_max_pages,
        })
    }

    fn transactions_url(&self, token: &str, limit: usize, before: Option<&str>) -> String {
        let mut url = format!(
            "{}/v0/addresses/{}/transactions?api-key={}&limit={}",
            self.base_url, token, self.api_key, limit
        );
        if let Some(signature) = before {
            url.push_str("&before=");
            url.push_str(signature);
        }
        url
    }

    async fn fetch_page(
        &self,
        token: &str,
        limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<EnhancedTransaction>> {
        debug!(
            "Requesting transaction page for {} (limit {}, before {:?})",
            token, limit, before
        );

        let url = self.transactions_url(token, limit, before);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BundleCheckError::api_error(format!(
                "indexer returned {}: {}",
                status, body
            )));
        }

        response
            .json::<Vec<EnhancedTransaction>>()
            .await
            .map_err(BundleCheckError::from)
    }

    /// Flattens a transaction into transfer records for the queried mint.
    fn extract_transfers(tx: EnhancedTransaction, mint: &str) -> Vec<TokenTransfer> {
        let timestamp_ms = tx.timestamp.unwrap_or(0) * 1000;

        tx.token_transfers
            .into_iter()
            .filter(|t| t.mint == mint)
            .map(|t| TokenTransfer {
                signature: tx.signature.clone(),
                timestamp_ms,
                from: t
                    .from_user_account
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| UNKNOWN_WALLET.to_string()),
                to: t
                    .to_user_account
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| UNKNOWN_WALLET.to_string()),
                amount: t.token_amount,
                slot: tx.slot,
            })
            .collect()
    }

    /// Probes the indexer with a minimal request. Used by `init` to
    /// verify the endpoint and API key before any real analysis.
    pub async fn check_connection(&self) -> Result<()> {
        // Wrapped SOL always has history, so a one-transaction page is a
        // cheap end-to-end check of endpoint, key and response shape.
        const WRAPPED_SOL: &str = "So11111111111111111111111111111111111111112";

        self.fetch_page(WRAPPED_SOL, 1, None).await?;
        Ok(())
    }
}

#[async_trait]
impl TransferProvider for HeliusClient {
    async fn fetch_transfers(
        &self,
        token: &str,
        period: FetchPeriod,
    ) -> Result<Vec<TokenTransfer>> {
        Pubkey::from_str(token)
            .map_err(|_| BundleCheckError::InvalidAddress(token.to_string()))?;

        let max_pages = match period {
            FetchPeriod::Launch => self.launch_max_pages,
            FetchPeriod::Recent => self.recent_max_pages,
        };

        let mut transfers = Vec::new();
        let mut before: Option<String> = None;
        let mut limit = self.fetch_limit;

        for page in 0..max_pages {
            let transactions = match self.fetch_page(token, limit, before.as_deref()).await {
                Ok(transactions) => transactions,
                Err(BundleCheckError::Api(msg))
                    if page == 0 && limit > self.reduced_fetch_limit =>
                {
                    // The indexer rejects page sizes that reach into
                    // long-term storage. One retry with a smaller page.
                    warn!(
                        "Indexer rejected limit {} ({}), retrying with limit {}",
                        limit, msg, self.reduced_fetch_limit
                    );
                    limit = self.reduced_fetch_limit;
                    self.fetch_page(token, limit, None).await?
                }
                Err(e) => return Err(e),
            };

            let page_len = transactions.len();
            if page_len == 0 {
                break;
            }

            before = transactions.last().map(|tx| tx.signature.clone());
            transfers.extend(
                transactions
                    .into_iter()
                    .flat_map(|tx| Self::extract_transfers(tx, token)),
            );

            // A short page means the history is exhausted.
            if page_len < limit {
                break;
            }
        }

        info!(
            "Fetched {} transfers for {} ({} period)",
            transfers.len(),
            token,
            period
        );

        Ok(transfers)
    }
}
