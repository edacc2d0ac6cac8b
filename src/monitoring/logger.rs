use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::analyzer::BundleAnalysis;
use crate::provider::FetchPeriod;

/// One completed analysis, flattened for the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisLog {
    pub timestamp: DateTime<Utc>,
    pub token: String,
    pub period: FetchPeriod,
    pub score: u8,
    pub risk_level: String,
    pub timing_cluster: u8,
    pub wallet_similarity: u8,
    pub size_patterns: u8,
    pub distribution: u8,
    pub total_transactions: usize,
    pub suspicious_wallets: usize,
}

impl AnalysisLog {
    pub fn from_analysis(token: &str, period: FetchPeriod, analysis: &BundleAnalysis) -> Self {
        Self {
            timestamp: Utc::now(),
            token: token.to_string(),
            period,
            score: analysis.score,
            risk_level: analysis.insights.risk_level.to_string(),
            timing_cluster: analysis.metrics.timing_cluster,
            wallet_similarity: analysis.metrics.wallet_similarity,
            size_patterns: analysis.metrics.size_patterns,
            distribution: analysis.metrics.distribution,
            total_transactions: analysis.details.total_transactions,
            suspicious_wallets: analysis.details.suspicious_wallets,
        }
    }
}

/// Append-only JSON Lines log of analysis results.
pub struct AnalysisLogger {
    log_path: PathBuf,
}

impl AnalysisLogger {
    pub fn new(log_dir: &str) -> Result<Self> {
        std::fs::create_dir_all(log_dir)?;

        Ok(Self {
            log_path: PathBuf::from(log_dir).join("analyses.jsonl"),
        })
    }

    pub fn record(&self, entry: AnalysisLog) -> Result<()> {
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    pub fn history(&self) -> Result<Vec<AnalysisLog>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.log_path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Into::into))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str, score: u8) -> AnalysisLog {
        AnalysisLog {
            timestamp: Utc::now(),
            token: token.to_string(),
            period: FetchPeriod::Recent,
            score,
            risk_level: "Low Risk".to_string(),
            timing_cluster: 0,
            wallet_similarity: 0,
            size_patterns: 0,
            distribution: 0,
            total_transactions: 1,
            suspicious_wallets: 0,
        }
    }

    #[test]
    fn records_round_trip_through_the_log() {
        let dir = std::env::temp_dir().join(format!("bundlecheck-logger-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let logger = AnalysisLogger::new(dir.to_str().unwrap()).unwrap();
        logger.record(entry("MintA", 12)).unwrap();
        logger.record(entry("MintB", 87)).unwrap();

        let history = logger.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].token, "MintA");
        assert_eq!(history[1].score, 87);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_log_yields_empty_history() {
        let dir = std::env::temp_dir().join(format!(
            "bundlecheck-logger-empty-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);

        let logger = AnalysisLogger::new(dir.to_str().unwrap()).unwrap();
        assert!(logger.history().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
