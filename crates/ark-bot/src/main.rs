//! The Ark bot binary.
//!
//! Start the bot with:
//! ```bash
//! BOT_TOKEN=xxx cargo run -p ark-bot
//! ```

use std::path::PathBuf;

use ark_bot::{ArkBot, BotConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// The Ark - Telegram bot and mini app server
#[derive(Parser, Debug)]
#[command(name = "ark-bot")]
#[command(about = "Telegram bot for The Ark with a shared link library")]
struct Args {
    /// Force polling mode even when PUBLIC_URL is set
    #[arg(long)]
    polling: bool,

    /// HTTP port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON store file (overrides ARK_DATA_FILE)
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "ark_bot=info,ark_web=info,ark_persistence=info,teloxide=warn",
        1 => "ark_bot=debug,ark_web=debug,ark_persistence=debug,teloxide=info",
        2 => "ark_bot=trace,ark_web=trace,ark_persistence=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = BotConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = args.data_file {
        config.data_file = path;
    }
    if args.polling {
        config.public_url = None;
    }

    let bot = ArkBot::new(config.clone());

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[ark] The Ark Bot");
            println!("   Bot: @{}", username);
            println!(
                "   Mode: {}",
                if config.public_url.is_some() { "webhook" } else { "polling" }
            );
            println!("   Pages: http://{}", config.bind_address());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n[phone] Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.start().await?;

    Ok(())
}
