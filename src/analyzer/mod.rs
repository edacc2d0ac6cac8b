pub mod engine;
pub mod insights;

pub use engine::analyze;
pub use insights::RiskLevel;

use serde::{Deserialize, Serialize};

/// Full result of scoring one token's transfer history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleAnalysis {
    /// Composite bundling-risk score, 0-100.
    pub score: u8,
    pub metrics: RiskMetrics,
    pub details: AnalysisDetails,
    pub insights: RiskInsights,
}

/// The four sub-scores feeding the composite, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub timing_cluster: u8,
    pub wallet_similarity: u8,
    pub size_patterns: u8,
    pub distribution: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub total_transactions: usize,
    pub unique_wallets: usize,
    /// Human-readable span of the analyzed history, e.g. "3h" or "2d".
    pub analysis_period: String,
    pub suspicious_wallets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskInsights {
    pub risk_level: RiskLevel,
    /// Index-paired with `recommendations`.
    pub primary_concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub explanation: String,
}
