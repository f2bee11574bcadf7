mod discord;
mod logging;

use std::sync::Arc;

use panelwatch_core::backends::SshRebooter;
use panelwatch_core::config::{log_file_from, BotConfig};
use serenity::all::{Client, GatewayIntents};
use serenity::gateway::GatewayError;
use serenity::http::HttpError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

use crate::discord::Handler;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("Usage: panelwatch-bot");
    eprintln!();
    eprintln!("Configuration is read from the environment and from .env if present.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --version   Print version and exit");
    eprintln!("  --help      Print this help message");
}

/// Whether a client error means Discord rejected the bot token.
fn is_invalid_token(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => true,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            response.status_code.as_u16() == 401
        }
        _ => false,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match std::env::args().nth(1).as_deref() {
        None => {}
        Some("--version") => {
            println!("panelwatch-bot {}", VERSION);
            return Ok(());
        }
        Some("--help") => {
            print_usage();
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown option: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }

    // A missing .env is fine; plain environment variables work too.
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env();
    let log_file = match &config {
        Ok(cfg) => cfg.log_file.clone(),
        Err(_) => log_file_from(std::env::var("LOG_FILE").ok()),
    };
    logging::init(log_file.as_deref())?;

    let config = match config {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "panelwatch-bot {} starting with {} targets",
        VERSION,
        config.targets.len()
    );

    let tracker = TaskTracker::new();
    let cancel = CancellationToken::new();
    let rebooter = Arc::new(SshRebooter::new(config.ssh_port, config.request_timeout));
    let handler = Handler::new(config.clone(), rebooter, tracker.clone(), cancel.clone());

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;
    let mut client = match Client::builder(&config.bot_token, intents)
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Discord client: {e}");
            std::process::exit(1);
        }
    };
    let shard_manager = client.shard_manager.clone();

    let mut exit_code = 0;
    tokio::select! {
        result = client.start() => {
            if let Err(e) = result {
                if is_invalid_token(&e) {
                    error!("Invalid BOT_TOKEN provided. Please check your .env file.");
                } else {
                    error!("Discord client stopped: {e}");
                }
                exit_code = 1;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            shard_manager.shutdown_all().await;
        }
    }

    cancel.cancel();
    tracker.close();
    tracker.wait().await;
    info!("panelwatch-bot stopped");

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
