//! Discount monitor: poll CoinMarketCap for two assets on a fixed interval and
//! alert Telegram chats when one trades below a fraction of the other.
//!
//! Usage: discount-monitor --cmc-api-key <key> --telegram-bot-token <token> --chat-ids <id,id,...>
//!
//! Every flag can also be set through the environment (or a `.env` file).
//! Defaults watch Carrot (24498) against Puffer (27295) at a 55% ratio.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use clients_coinmarketcap::{CoinMarketCapClient, CoinMarketCapClientConfig};
use clients_telegrambot::TelegramBot;
use discount::{validate_credential, AssetConfig, DiscountMonitor, MonitorConfig, Recipient};
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(name = "discount-monitor")]
#[command(about = "Alert Telegram chats when an asset trades at a discount to a reference asset")]
struct Args {
    /// CoinMarketCap Pro API key
    #[arg(long, env = "CMC_API_KEY", hide_env_values = true)]
    cmc_api_key: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_bot_token: Option<String>,

    /// Comma separated Telegram chat ids to alert
    #[arg(long, env = "TELEGRAM_CHAT_IDS", value_delimiter = ',')]
    chat_ids: Vec<String>,

    /// Alert when discounted price < reference price * ratio
    #[arg(long, env = "DISCOUNT_RATIO", default_value_t = 0.55)]
    discount_ratio: f64,

    /// Seconds between price checks
    #[arg(long, env = "CHECK_INTERVAL_SECS", default_value_t = 300)]
    check_interval_secs: u64,

    /// Minimum seconds between two alerts
    #[arg(long, env = "MIN_NOTIFICATION_INTERVAL_SECS", default_value_t = 3600)]
    min_notification_interval_secs: u64,

    /// CoinMarketCap id of the asset expected to trade at a discount
    #[arg(long, env = "DISCOUNTED_ASSET_ID", default_value = "24498")]
    discounted_asset_id: String,

    #[arg(long, env = "DISCOUNTED_ASSET_NAME", default_value = "Carrot")]
    discounted_asset_name: String,

    /// CoinMarketCap id of the reference asset
    #[arg(long, env = "REFERENCE_ASSET_ID", default_value = "27295")]
    reference_asset_id: String,

    #[arg(long, env = "REFERENCE_ASSET_NAME", default_value = "Puffer")]
    reference_asset_name: String,

    /// Append-only log file
    #[arg(long, env = "LOG_FILE", default_value = "price-monitor.log")]
    log_file: PathBuf,

    #[arg(long, env = "CMC_BASE_URL", default_value = clients_coinmarketcap::DEFAULT_BASE_URL)]
    cmc_base_url: String,

    /// Timeout applied to every outbound HTTP request
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let _guard = match utils::init_logging(&args.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let api_key = validate_credential("CMC_API_KEY", args.cmc_api_key.as_deref())
        .context("invalid configuration")?
        .to_string();
    let bot_token = validate_credential("TELEGRAM_BOT_TOKEN", args.telegram_bot_token.as_deref())
        .context("invalid configuration")?
        .to_string();

    let config = MonitorConfig {
        discounted_asset: AssetConfig::new(args.discounted_asset_id, args.discounted_asset_name),
        reference_asset: AssetConfig::new(args.reference_asset_id, args.reference_asset_name),
        discount_ratio: args.discount_ratio,
        check_interval: Duration::from_secs(args.check_interval_secs),
        min_notification_interval: Duration::from_secs(args.min_notification_interval_secs),
        recipients: args
            .chat_ids
            .iter()
            .map(|id| Recipient::new(id.trim()))
            .collect(),
    };
    config.validate().context("invalid configuration")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.request_timeout_secs))
        .build()?;
    let source = CoinMarketCapClient::new(
        client.clone(),
        CoinMarketCapClientConfig {
            api_key,
            base_url: args.cmc_base_url,
        },
    );
    let telegram = TelegramBot::new(client, bot_token);

    let mut monitor = DiscountMonitor::new(config, source, telegram);
    monitor
        .run(shutdown_signal())
        .await
        .context("invalid configuration")?;
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received");
}
