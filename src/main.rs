mod bot;
mod cdn;
mod command;
mod commands;
mod config;
mod discord_api;
mod fetch;
mod format;
mod gradient;
mod message;
mod permissions;
mod session;
mod surface;

#[cfg(test)]
mod testing;

use std::path::Path;
use std::sync::Arc;

use bot::Bot;
use cdn::Cdn;
use command::CommandContext;
use config::Config;
use discord_api::DiscordApi;
use session::SessionTracker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,serenity=warn"),
    )
    .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let path = Path::new(&config_path);
    if !path.exists() {
        eprintln!("Config file not found: {}", config_path);
        eprintln!("Copy the example and edit it:");
        eprintln!("  cp config.example.toml config.toml");
        std::process::exit(1);
    }

    let config = Config::load(path)?;
    log::info!("Loaded config from {}", config_path);

    let tracker = Arc::new(SessionTracker::new(config.showcase.history_limit));
    let ctx = CommandContext {
        fetcher: Arc::new(DiscordApi::new(&config.api.base_url, &config.bot.token)),
        cdn: Cdn::new(&config.api.cdn_url),
    };

    let registry = commands::build_registry(&config, tracker);
    log::info!("Registered {} command(s)", registry.all().len());

    let bot = Bot::new(Arc::new(config), registry, ctx);
    bot.run().await
}
