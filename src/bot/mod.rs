use std::sync::Arc;

use serenity::all::GatewayIntents;
use serenity::Client;

use crate::command::{CommandContext, CommandRegistry};
use crate::config::Config;

mod command_handler;
mod handler;
mod rate_limit;
mod render;
mod responder;


use handler::Handler;
use rate_limit::RateLimiter;

pub struct Bot {
    config: Arc<Config>,
    registry: Arc<CommandRegistry>,
    /// Services shared by every command invocation.
    ctx: CommandContext,
    rate_limiter: RateLimiter,
}

impl Bot {
    pub fn new(config: Arc<Config>, registry: CommandRegistry, ctx: CommandContext) -> Self {
        let rate_limiter = RateLimiter::new(
            config.bot.rate_limit_commands,
            config.bot.rate_limit_window_secs,
        );
        Self {
            config,
            registry: Arc::new(registry),
            ctx,
            rate_limiter,
        }
    }

    /// Connect to the gateway and serve events until the client stops.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let token = self.config.bot.token.clone();
        let handler = Handler {
            bot: Arc::new(self),
        };

        let intents = GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::DIRECT_MESSAGES;

        let mut client = Client::builder(&token, intents)
            .event_handler(handler)
            .await?;

        if let Err(e) = client.start().await {
            log::error!("Discord client error: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}
