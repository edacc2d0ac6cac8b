mod analyzer;
mod config;
mod error;
mod monitoring;
mod provider;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use analyzer::{BundleAnalysis, RiskLevel};
use error::BundleCheckError;
use monitoring::{logger::AnalysisLog, AnalysisLogger, TelegramNotifier};
use provider::{FetchPeriod, HeliusClient, TransferProvider};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a token's transfer history for bundling risk
    Analyze {
        /// Token mint address
        token: String,

        /// How much history to pull from the indexer
        #[arg(long, value_enum, default_value_t = FetchPeriod::Recent)]
        period: FetchPeriod,

        /// Print the result as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Check configuration and indexer connectivity
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Analyze {
            token,
            period,
            json,
        }) => {
            run_analysis(token, *period, *json).await?;
        }
        Some(Commands::Init) => {
            config::initialize_config().await?;
        }
        None => {
            info!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

async fn run_analysis(token: &str, period: FetchPeriod, json: bool) -> Result<()> {
    let config = config::load_config()?;

    let provider = HeliusClient::new(&config)?;
    let analysis_logger = AnalysisLogger::new(&config.log_dir)?;
    let telegram = TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
    );

    info!("Fetching transfer history for {} ({} period)", token, period);
    let transfers = provider.fetch_transfers(token, period).await?;

    let analysis = match analyzer::analyze(&transfers) {
        Ok(analysis) => analysis,
        Err(BundleCheckError::EmptyInput) => {
            println!(
                "No transactions found for {} over the {} period.",
                token, period
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(token, &analysis);
    }

    if let Err(e) = analysis_logger.record(AnalysisLog::from_analysis(token, period, &analysis)) {
        error!("Failed to record analysis: {}", e);
    }

    if analysis.insights.risk_level == RiskLevel::High {
        if let Err(e) = telegram.notify_high_risk(token, &analysis).await {
            error!("Failed to send Telegram alert: {}", e);
        }
    }

    Ok(())
}

fn print_report(token: &str, analysis: &BundleAnalysis) {
    println!();
    println!("Bundling analysis for {}", token);
    println!(
        "Score: {}/100 ({})",
        analysis.score, analysis.insights.risk_level
    );
    println!();
    println!("  Timing clustering   {:>3}", analysis.metrics.timing_cluster);
    println!("  Wallet similarity   {:>3}", analysis.metrics.wallet_similarity);
    println!("  Size patterns       {:>3}", analysis.metrics.size_patterns);
    println!("  Distribution        {:>3}", analysis.metrics.distribution);
    println!();
    println!(
        "Transactions: {} | Unique wallets: {} | Suspicious wallets: {} | Period: {}",
        analysis.details.total_transactions,
        analysis.details.unique_wallets,
        analysis.details.suspicious_wallets,
        analysis.details.analysis_period
    );
    println!();
    for (concern, recommendation) in analysis
        .insights
        .primary_concerns
        .iter()
        .zip(&analysis.insights.recommendations)
    {
        println!("  - {}", concern);
        println!("    -> {}", recommendation);
    }
    println!();
    println!("{}", analysis.insights.explanation);
}
