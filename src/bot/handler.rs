//! Gateway events in, dispatcher calls out.

use std::collections::HashMap;
use std::sync::Arc;

use serenity::all::{
    ChannelId, Command as SlashCommand, CommandDataOption, CommandDataOptionValue,
    CommandOptionType, ComponentInteraction, ComponentInteractionDataKind, Context,
    CreateCommand, CreateCommandOption, EventHandler, GuildId, Http, Interaction, Message, Ready,
    User,
};
use serenity::async_trait;

use crate::command::Command;
use crate::message::{CommandScope, ComponentAction, Invocation, OptionKind, OptionValue};

use super::responder::{CommandResponder, ComponentResponder, MessageResponder};
use super::Bot;

pub(super) struct Handler {
    pub(super) bot: Arc<Bot>,
}

fn invocation(
    user: &User,
    guild_id: Option<GuildId>,
    channel_id: ChannelId,
    options: HashMap<String, OptionValue>,
) -> Invocation {
    Invocation {
        user_id: user.id.get(),
        username: user.name.clone(),
        user_tag: user.tag(),
        guild_id: guild_id.map(|g| g.get()),
        channel_id: channel_id.get(),
        options,
    }
}

fn slash_options(options: &[CommandDataOption]) -> HashMap<String, OptionValue> {
    options
        .iter()
        .filter_map(|o| {
            let value = match &o.value {
                CommandDataOptionValue::User(id) => OptionValue::User(id.get()),
                CommandDataOptionValue::Role(id) => OptionValue::Role(id.get()),
                _ => return None,
            };
            Some((o.name.clone(), value))
        })
        .collect()
}

fn component_action(interaction: &ComponentInteraction) -> ComponentAction {
    let values = match &interaction.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => values.clone(),
        _ => Vec::new(),
    };
    ComponentAction {
        custom_id: interaction.data.custom_id.clone(),
        values,
        user_id: interaction.user.id.get(),
        username: interaction.user.name.clone(),
        guild_id: interaction.guild_id.map(|g| g.get()),
        message_id: interaction.message.id.get(),
    }
}

/// Application command definition for a registered command.
pub(super) fn slash_command(command: &dyn Command) -> CreateCommand {
    let mut builder = CreateCommand::new(command.name()).description(command.description());
    if command.scope() == CommandScope::Guild {
        builder = builder.dm_permission(false);
    }
    for option in command.options() {
        let kind = match option.kind {
            OptionKind::User => CommandOptionType::User,
            OptionKind::Role => CommandOptionType::Role,
        };
        builder = builder.add_option(
            CreateCommandOption::new(kind, option.name, option.description)
                .required(option.required),
        );
    }
    builder
}

impl Bot {
    async fn register_slash_commands(
        &self,
        http: &Http,
    ) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let commands: Vec<CreateCommand> = self
            .registry
            .all()
            .iter()
            .map(|c| slash_command(c.as_ref()))
            .collect();

        let registered = match self.config.bot.guild_id {
            Some(guild_id) => GuildId::new(guild_id).set_commands(http, commands).await?,
            None => SlashCommand::set_global_commands(http, commands).await?,
        };
        Ok(registered.len())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("Discord bot connected as {}", ready.user.name);

        match self.bot.register_slash_commands(&ctx.http).await {
            Ok(count) => match self.bot.config.bot.guild_id {
                Some(guild_id) => {
                    log::info!("Registered {} slash commands in guild {}", count, guild_id)
                }
                None => log::info!("Registered {} global slash commands", count),
            },
            Err(e) => log::error!("Failed to register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => {
                let inv = invocation(
                    &command.user,
                    command.guild_id,
                    command.channel_id,
                    slash_options(&command.data.options),
                );
                let name = command.data.name.clone();
                let responder = CommandResponder::new(Arc::clone(&ctx.http), command);
                self.bot.dispatch_slash(&name, &inv, &responder).await;
            }
            Interaction::Component(component) => {
                let action = component_action(&component);
                let responder = ComponentResponder::new(Arc::clone(&ctx.http), component);
                self.bot.dispatch_component(&action, &responder).await;
            }
            _ => {}
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore messages from bots (including ourselves)
        if msg.author.bot {
            return;
        }

        let content = msg.content.trim();
        if !content.starts_with(self.bot.config.bot.command_prefix.as_str()) {
            return;
        }

        let inv = invocation(&msg.author, msg.guild_id, msg.channel_id, HashMap::new());
        let responder = MessageResponder::new(Arc::clone(&ctx.http), msg.channel_id, msg.id);
        self.bot.dispatch_text(inv, content, &responder).await;
    }
}
