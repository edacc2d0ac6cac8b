//! Bundling-risk scoring engine.
//!
//! Pure transformation from a token's transfer history into four
//! sub-scores, a weighted composite and supporting details. The engine
//! holds no state and performs no I/O; every invocation recomputes from
//! the input list, so concurrent calls are safe.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{BundleCheckError, Result};
use crate::provider::TokenTransfer;

use super::{insights, AnalysisDetails, BundleAnalysis, RiskMetrics};

/// Gap windows (ms) used when hunting for bursts of near-simultaneous
/// transfers: 30s, 60s and 5min.
const CLUSTER_WINDOWS_MS: [i64; 3] = [30_000, 60_000, 300_000];

/// Two transfers into the same wallet closer together than this mark
/// the wallet as suspicious.
const RAPID_REPEAT_WINDOW_MS: i64 = 300_000;

const TIMING_WEIGHT: f64 = 0.4;
const WALLET_WEIGHT: f64 = 0.3;
const SIZE_WEIGHT: f64 = 0.2;
const DISTRIBUTION_WEIGHT: f64 = 0.1;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Scores a token's transfer history for signs of coordinated buying.
///
/// Fails with [`BundleCheckError::EmptyInput`] when there is nothing to
/// analyze; callers surface that as "no transactions found" rather than
/// a zero score. Output does not depend on the order of `transfers`.
pub fn analyze(transfers: &[TokenTransfer]) -> Result<BundleAnalysis> {
    if transfers.is_empty() {
        return Err(BundleCheckError::EmptyInput);
    }

    // Fail fast on records that would silently skew every statistic.
    if let Some(bad) = transfers
        .iter()
        .find(|t| !t.amount.is_finite() || t.amount < 0.0)
    {
        return Err(BundleCheckError::MalformedRecord(format!(
            "transfer {} has invalid amount {}",
            bad.signature, bad.amount
        )));
    }

    let metrics = RiskMetrics {
        timing_cluster: timing_cluster_score(transfers),
        wallet_similarity: wallet_similarity_score(transfers),
        size_patterns: size_pattern_score(transfers),
        distribution: distribution_score(transfers),
    };
    let score = composite_score(&metrics);

    debug!(
        "Scored {} transfers: composite {} (timing {}, wallet {}, size {}, distribution {})",
        transfers.len(),
        score,
        metrics.timing_cluster,
        metrics.wallet_similarity,
        metrics.size_patterns,
        metrics.distribution
    );

    Ok(BundleAnalysis {
        score,
        metrics,
        details: AnalysisDetails {
            total_transactions: transfers.len(),
            unique_wallets: unique_wallet_count(transfers),
            analysis_period: analysis_period(transfers),
            suspicious_wallets: suspicious_wallet_count(transfers),
        },
        insights: insights::build_insights(score, &metrics),
    })
}

/// Share of transfers landing in the largest burst.
///
/// Sorts timestamps and, for each window size, greedily grows runs of
/// consecutive transfers whose gap stays within the window. The largest
/// run (of at least two transfers) across all windows, relative to the
/// total count, drives the score; a burst covering half the history
/// already saturates it.
fn timing_cluster_score(transfers: &[TokenTransfer]) -> u8 {
    if transfers.len() < 2 {
        return 0;
    }

    let mut timestamps: Vec<i64> = transfers.iter().map(|t| t.timestamp_ms).collect();
    timestamps.sort_unstable();

    let mut max_cluster = 0usize;
    for window in CLUSTER_WINDOWS_MS {
        let mut cluster = 1usize;
        for pair in timestamps.windows(2) {
            if pair[1] - pair[0] <= window {
                cluster += 1;
            } else {
                if cluster >= 2 {
                    max_cluster = max_cluster.max(cluster);
                }
                cluster = 1;
            }
        }
        if cluster >= 2 {
            max_cluster = max_cluster.max(cluster);
        }
    }

    let ratio = max_cluster as f64 / transfers.len() as f64;
    (ratio * 200.0).min(100.0).round() as u8
}

/// Uniformity of per-wallet transfer counts.
///
/// Near-identical counts across receiving wallets are evidence of
/// scripted distribution, so low variation scores high.
fn wallet_similarity_score(transfers: &[TokenTransfer]) -> u8 {
    if transfers.len() < 2 {
        return 0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for transfer in transfers {
        *counts.entry(transfer.to.as_str()).or_insert(0) += 1;
    }

    let values: Vec<f64> = counts.values().map(|&c| c as f64).collect();
    let cv = coefficient_of_variation(&values);
    (100.0 - cv * 50.0).max(0.0).round() as u8
}

/// Uniformity of transfer amounts. Near-identical sizes suggest preset
/// buy amounts.
fn size_pattern_score(transfers: &[TokenTransfer]) -> u8 {
    if transfers.len() < 2 {
        return 0;
    }

    let amounts: Vec<f64> = transfers.iter().map(|t| t.amount).collect();
    let cv = coefficient_of_variation(&amounts);
    (100.0 - cv * 100.0).max(0.0).round() as u8
}

/// Concentration of received amounts, as the Gini coefficient over
/// per-wallet totals.
fn distribution_score(transfers: &[TokenTransfer]) -> u8 {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for transfer in transfers {
        *totals.entry(transfer.to.as_str()).or_insert(0.0) += transfer.amount;
    }

    if totals.len() < 2 {
        return 0;
    }

    let amounts: Vec<f64> = totals.values().copied().collect();
    let total: f64 = amounts.iter().sum();
    if total == 0.0 {
        return 0;
    }

    // Pairwise mean-absolute-difference form. Quadratic in unique
    // wallets, which stays small per token; switch to the sort-based
    // form before running this over anything market-wide.
    let mut diff_sum = 0.0;
    for a in &amounts {
        for b in &amounts {
            diff_sum += (a - b).abs();
        }
    }

    let gini = diff_sum / (2.0 * amounts.len() as f64 * total);
    (gini * 100.0).round() as u8
}

fn composite_score(metrics: &RiskMetrics) -> u8 {
    let weighted = TIMING_WEIGHT * metrics.timing_cluster as f64
        + WALLET_WEIGHT * metrics.wallet_similarity as f64
        + SIZE_WEIGHT * metrics.size_patterns as f64
        + DISTRIBUTION_WEIGHT * metrics.distribution as f64;
    weighted.round().clamp(0.0, 100.0) as u8
}

/// Population coefficient of variation; 0 when the mean is 0.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt() / mean
}

fn unique_wallet_count(transfers: &[TokenTransfer]) -> usize {
    let mut wallets: HashSet<&str> = HashSet::new();
    for transfer in transfers {
        wallets.insert(transfer.from.as_str());
        wallets.insert(transfer.to.as_str());
    }
    wallets.len()
}

/// Wallets receiving at least twice within [`RAPID_REPEAT_WINDOW_MS`].
/// Each qualifying wallet counts once however many rapid pairs it has.
fn suspicious_wallet_count(transfers: &[TokenTransfer]) -> usize {
    let mut by_wallet: HashMap<&str, Vec<i64>> = HashMap::new();
    for transfer in transfers {
        by_wallet
            .entry(transfer.to.as_str())
            .or_default()
            .push(transfer.timestamp_ms);
    }

    let mut count = 0;
    for timestamps in by_wallet.values_mut() {
        if timestamps.len() < 2 {
            continue;
        }
        timestamps.sort_unstable();
        if timestamps
            .windows(2)
            .any(|pair| pair[1] - pair[0] <= RAPID_REPEAT_WINDOW_MS)
        {
            count += 1;
        }
    }
    count
}

/// Span of the history as "{h}h" under a day, "{d}d" from there on.
fn analysis_period(transfers: &[TokenTransfer]) -> String {
    let min = transfers.iter().map(|t| t.timestamp_ms).min();
    let max = transfers.iter().map(|t| t.timestamp_ms).max();
    let (Some(min), Some(max)) = (min, max) else {
        return "0h".to_string();
    };

    let hours = ((max - min) as f64 / MS_PER_HOUR).round() as i64;
    if hours < 24 {
        format!("{}h", hours)
    } else {
        format!("{}d", (hours as f64 / 24.0).round() as i64)
    }
}
