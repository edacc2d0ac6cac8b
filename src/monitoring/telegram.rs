use anyhow::Result;
use reqwest::Client;
use tracing::{error, info};

use crate::analyzer::BundleAnalysis;

pub struct TelegramNotifier {
    bot_token: Option<String>,
    chat_id: Option<String>,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            bot_token,
            chat_id,
            client: Client::new(),
        }
    }

    /// Sends a summary of a high-risk result. Missing credentials
    /// downgrade to a logged skip rather than an error.
    pub async fn notify_high_risk(&self, token: &str, analysis: &BundleAnalysis) -> Result<()> {
        let message = Self::format_alert(token, analysis);
        self.send_notification(&message).await
    }

    fn format_alert(token: &str, analysis: &BundleAnalysis) -> String {
        format!(
            "<b>🚨 Bundling Alert: {}</b>\n\n\
            Token: <code>{}</code>\n\
            Score: <b>{}/100</b>\n\
            Timing: <b>{}</b> | Wallets: <b>{}</b> | Sizes: <b>{}</b> | Distribution: <b>{}</b>\n\
            Suspicious wallets: <b>{}</b>\n\
            Concern: {}",
            analysis.insights.risk_level,
            token,
            analysis.score,
            analysis.metrics.timing_cluster,
            analysis.metrics.wallet_similarity,
            analysis.metrics.size_patterns,
            analysis.metrics.distribution,
            analysis.details.suspicious_wallets,
            analysis
                .insights
                .primary_concerns
                .first()
                .map(String::as_str)
                .unwrap_or("-"),
        )
    }

    async fn send_notification(&self, message: &str) -> Result<()> {
        // Check if Telegram integration is configured
        let (bot_token, chat_id) = match (&self.bot_token, &self.chat_id) {
            (Some(token), Some(chat)) => (token, chat),
            _ => {
                info!("Telegram alert skipped: bot token or chat ID not configured");
                return Ok(());
            }
        };

        let url = format!("https://api.telegram.org/bot{}/sendMessage", bot_token);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("chat_id", chat_id.as_str()),
                ("text", message),
                ("parse_mode", "HTML"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            error!("Failed to send Telegram alert: {}", error_text);
            return Err(anyhow::anyhow!("Telegram API error: {}", error_text));
        }

        info!("Telegram alert sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisDetails, RiskInsights, RiskLevel, RiskMetrics};

    #[test]
    fn alert_message_carries_the_essentials() {
        let analysis = BundleAnalysis {
            score: 85,
            metrics: RiskMetrics {
                timing_cluster: 95,
                wallet_similarity: 80,
                size_patterns: 75,
                distribution: 40,
            },
            details: AnalysisDetails {
                total_transactions: 120,
                unique_wallets: 34,
                analysis_period: "3h".to_string(),
                suspicious_wallets: 7,
            },
            insights: RiskInsights {
                risk_level: RiskLevel::High,
                primary_concerns: vec!["High timing coordination between transactions".into()],
                recommendations: vec!["Check if the token was launched through a bundling service".into()],
                explanation: String::new(),
            },
        };

        let message = TelegramNotifier::format_alert("MintXYZ", &analysis);
        assert!(message.contains("MintXYZ"));
        assert!(message.contains("85/100"));
        assert!(message.contains("High Risk"));
        assert!(message.contains("Suspicious wallets: <b>7</b>"));
        assert!(message.contains("High timing coordination"));
    }
}
