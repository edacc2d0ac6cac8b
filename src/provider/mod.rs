pub mod helius;

pub use helius::HeliusClient;

use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sentinel address used when the indexer does not report an account
/// for one side of a transfer. It is a valid value, not an error.
pub const UNKNOWN_WALLET: &str = "unknown";

/// One token movement between two wallets at a point in ledger time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTransfer {
    /// Transaction signature. Not unique across records, since one
    /// transaction can carry several transfers.
    pub signature: String,
    /// Milliseconds since epoch. May be defaulted when the indexer
    /// omits a block time.
    pub timestamp_ms: i64,
    pub from: String,
    pub to: String,
    /// Raw token units, not normalized by decimals.
    pub amount: f64,
    /// Ledger position, informational only.
    pub slot: u64,
}

/// How much history to request from the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchPeriod {
    /// Walk back toward the token's earliest recorded activity.
    Launch,
    /// Latest activity only.
    Recent,
}

impl fmt::Display for FetchPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchPeriod::Launch => "launch",
            FetchPeriod::Recent => "recent",
        })
    }
}

/// Source of transfer history for a token. Returns an ordered list of
/// transfer records, or a descriptive error.
#[async_trait]
pub trait TransferProvider {
    async fn fetch_transfers(
        &self,
        token: &str,
        period: FetchPeriod,
    ) -> Result<Vec<TokenTransfer>>;
}
