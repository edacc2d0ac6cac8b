//! Turns the numeric metrics into human-readable findings.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{RiskInsights, RiskMetrics};

const TIMING_CONCERN_THRESHOLD: u8 = 70;
const WALLET_CONCERN_THRESHOLD: u8 = 60;
const SIZE_CONCERN_THRESHOLD: u8 = 60;
const DISTRIBUTION_CONCERN_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => Self::High,
            s if s >= 60 => Self::Medium,
            s if s >= 40 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Medium => "Medium Risk",
            Self::Moderate => "Moderate Risk",
            Self::Low => "Low Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the concern/recommendation pairs and narrative for a scored
/// history. Pairs are appended in a fixed order and stay index-aligned,
/// so concern `i` always maps to recommendation `i`.
pub fn build_insights(score: u8, metrics: &RiskMetrics) -> RiskInsights {
    let mut concerns = Vec::new();
    let mut recommendations = Vec::new();

    if metrics.timing_cluster >= TIMING_CONCERN_THRESHOLD {
        concerns.push("High timing coordination between transactions".to_string());
        recommendations
            .push("Check if the token was launched through a bundling service".to_string());
    }
    if metrics.wallet_similarity >= WALLET_CONCERN_THRESHOLD {
        concerns.push("Receiving wallets show very similar behavior".to_string());
        recommendations
            .push("Check whether the wallets share funding or creation history".to_string());
    }
    if metrics.size_patterns >= SIZE_CONCERN_THRESHOLD {
        concerns.push("Transfer amounts look automated".to_string());
        recommendations.push("Verify whether the buys are placed by bots".to_string());
    }
    if metrics.distribution >= DISTRIBUTION_CONCERN_THRESHOLD {
        concerns.push("Supply is highly concentrated in a few wallets".to_string());
        recommendations.push("Monitor the large holders for coordinated exits".to_string());
    }

    if concerns.is_empty() {
        concerns.push("No major red flags detected".to_string());
        recommendations.push("Continue monitoring trading activity".to_string());
    }

    RiskInsights {
        risk_level: RiskLevel::from_score(score),
        primary_concerns: concerns,
        recommendations,
        explanation: explanation_for(score).to_string(),
    }
}

fn explanation_for(score: u8) -> &'static str {
    match score {
        s if s >= 70 => {
            "The transfer history shows strong signs of coordinated buying. \
             Large bursts of near-simultaneous transactions, uniform behavior \
             across receiving wallets or tightly scripted amounts suggest the \
             token was accumulated by bots or a bundling service rather than \
             organic buyers."
        }
        s if s >= 40 => {
            "The transfer history mixes organic activity with some coordinated \
             patterns. Parts of the volume look scripted, but there is enough \
             variation in timing, wallets and amounts that genuine buyers are \
             likely present as well."
        }
        _ => {
            "The transfer history looks largely organic. Transactions are \
             spread out in time, receiving wallets behave differently from one \
             another and amounts vary the way human-driven trading usually \
             does."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(timing: u8, wallet: u8, size: u8, distribution: u8) -> RiskMetrics {
        RiskMetrics {
            timing_cluster: timing,
            wallet_similarity: wallet,
            size_patterns: size,
            distribution,
        }
    }

    #[test]
    fn risk_level_buckets() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(79), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
    }

    #[test]
    fn all_concerns_fire_in_table_order() {
        let insights = build_insights(90, &metrics(70, 60, 60, 70));

        assert_eq!(insights.primary_concerns.len(), 4);
        assert_eq!(insights.recommendations.len(), 4);
        assert!(insights.primary_concerns[0].contains("timing"));
        assert!(insights.primary_concerns[1].contains("wallets"));
        assert!(insights.primary_concerns[2].contains("amounts"));
        assert!(insights.primary_concerns[3].contains("concentrated"));
        assert!(insights.recommendations[0].contains("bundling service"));
        assert!(insights.recommendations[3].contains("large holders"));
    }

    #[test]
    fn thresholds_are_inclusive() {
        // One point below each threshold fires nothing.
        let quiet = build_insights(30, &metrics(69, 59, 59, 69));
        assert_eq!(
            quiet.primary_concerns,
            vec!["No major red flags detected".to_string()]
        );
        assert_eq!(
            quiet.recommendations,
            vec!["Continue monitoring trading activity".to_string()]
        );
    }

    #[test]
    fn explanation_follows_the_score() {
        assert!(build_insights(70, &metrics(0, 0, 0, 0))
            .explanation
            .contains("strong signs"));
        assert!(build_insights(40, &metrics(0, 0, 0, 0))
            .explanation
            .contains("mixes organic"));
        assert!(build_insights(39, &metrics(0, 0, 0, 0))
            .explanation
            .contains("largely organic"));
    }
}
