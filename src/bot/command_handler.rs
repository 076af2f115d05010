use std::collections::HashMap;

use crate::command::Responder;
use crate::format::parse_snowflake;
use crate::message::{
    CommandOption, CommandScope, ComponentAction, Invocation, OptionKind, OptionValue, Reply,
};

use super::Bot;

const RATE_LIMITED: &str = "⏳ You're using commands too quickly. Please wait a moment.";
const UNKNOWN_COMMAND: &str = "❌ Unknown command.";
const UNKNOWN_COMPONENT: &str = "❌ This interaction is no longer available.";
const COMMAND_FAILED: &str = "❌ Something went wrong while running that command.";

fn scope_notice(scope: &CommandScope) -> &'static str {
    match scope {
        CommandScope::DM => "❌ This command can only be used in direct messages.",
        _ => "❌ This command can only be used in a server.",
    }
}

async fn notify(responder: &dyn Responder, text: &str) {
    if let Err(e) = responder.reply(Reply::notice(text)).await {
        log::error!("Failed to send notice: {}", e);
    }
}

/// First chunk answers the command, the rest follow it.
async fn send_chunks(
    responder: &dyn Responder,
    chunks: Vec<Reply>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    for (i, chunk) in chunks.into_iter().enumerate() {
        if i == 0 {
            responder.reply(chunk).await?;
        } else {
            responder.follow_up(chunk).await?;
        }
    }
    Ok(())
}

/// Binds positional text arguments to declared options.
/// Returns the offending argument when one is not an id or mention.
pub(super) fn bind_arguments(
    options: &[CommandOption],
    args: &str,
) -> Result<HashMap<String, OptionValue>, String> {
    let mut bound = HashMap::new();
    for (option, arg) in options.iter().zip(args.split_whitespace()) {
        let id = parse_snowflake(arg).ok_or_else(|| arg.to_string())?;
        let value = match option.kind {
            OptionKind::User => OptionValue::User(id),
            OptionKind::Role => OptionValue::Role(id),
        };
        bound.insert(option.name.to_string(), value);
    }
    Ok(bound)
}

impl Bot {
    pub(super) async fn dispatch_slash(
        &self,
        name: &str,
        inv: &Invocation,
        responder: &dyn Responder,
    ) {
        if !self.rate_limiter.check(inv.user_id) {
            log::warn!("Rate limited: {} ({})", inv.username, inv.user_id);
            notify(responder, RATE_LIMITED).await;
            return;
        }

        let command = match self.registry.find_by_command(name) {
            Some(c) => c,
            None => {
                log::warn!("Unknown slash command: {}", name);
                notify(responder, UNKNOWN_COMMAND).await;
                return;
            }
        };

        let scope = command.scope();
        if !scope.allows(inv.is_dm()) {
            notify(responder, scope_notice(&scope)).await;
            return;
        }

        log::debug!("/{} from {} ({})", name, inv.username, inv.user_id);
        if let Err(e) = command.execute(inv, &self.ctx, responder).await {
            log::error!("Command {} error: {}", command.name(), e);
            notify(responder, COMMAND_FAILED).await;
        }
    }

    pub(super) async fn dispatch_text(
        &self,
        mut inv: Invocation,
        trimmed_text: &str,
        responder: &dyn Responder,
    ) {
        let (name, args) = match self.parse_command(trimmed_text) {
            Some(parts) => parts,
            None => return,
        };
        if name.is_empty() {
            return;
        }

        if !self.rate_limiter.check(inv.user_id) {
            log::warn!("Rate limited: {} ({})", inv.username, inv.user_id);
            return;
        }

        if name == "help" {
            let chunks = Reply::chunked(&self.generate_help_text());
            if let Err(e) = send_chunks(responder, chunks).await {
                log::error!("Failed to send help: {}", e);
            }
            return;
        }

        let command = match self.registry.find_by_command(name) {
            Some(c) => c,
            None => {
                log::debug!("Ignoring unknown command: {}", name);
                return;
            }
        };

        let scope = command.scope();
        if !scope.allows(inv.is_dm()) {
            notify(responder, scope_notice(&scope)).await;
            return;
        }

        match bind_arguments(&command.options(), args) {
            Ok(options) => inv.options = options,
            Err(arg) => {
                notify(responder, &format!("❌ Invalid ID: `{}`", arg)).await;
                return;
            }
        }

        log::debug!("{}{} from {} ({})", self.config.bot.command_prefix, name, inv.username, inv.user_id);
        let result = match command.execute_text(&inv, &self.ctx).await {
            Ok(Some(chunks)) => send_chunks(responder, chunks).await,
            Ok(None) => command.execute(&inv, &self.ctx, responder).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            log::error!("Command {} error: {}", command.name(), e);
            notify(responder, COMMAND_FAILED).await;
        }
    }

    pub(super) async fn dispatch_component(
        &self,
        action: &ComponentAction,
        responder: &dyn Responder,
    ) {
        let command = match self.registry.find_by_component(&action.custom_id) {
            Some(c) => c,
            None => {
                log::warn!("No handler for component {}", action.custom_id);
                notify(responder, UNKNOWN_COMPONENT).await;
                return;
            }
        };

        log::debug!(
            "Component {} from {} routed to {}",
            action.custom_id,
            action.user_id,
            command.name()
        );
        if let Err(e) = command.handle_component(action, &self.ctx, responder).await {
            log::error!("Command {} component error: {}", command.name(), e);
            notify(responder, COMMAND_FAILED).await;
        }
    }

    pub(super) fn parse_command<'a>(&self, trimmed_text: &'a str) -> Option<(&'a str, &'a str)> {
        let prefix = &self.config.bot.command_prefix;
        let (raw_command, args) = match trimmed_text.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (trimmed_text, ""),
        };

        raw_command
            .strip_prefix(prefix.as_str())
            .map(|cmd| (cmd, args))
    }

    pub(super) fn generate_help_text(&self) -> String {
        let prefix = &self.config.bot.command_prefix;
        let mut lines = Vec::new();
        for command in self.registry.all() {
            let names = std::iter::once(command.name())
                .chain(command.aliases().iter().copied())
                .map(|n| format!("{}{}", prefix, n))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("{} - {}", names, command.description()));
        }
        if lines.is_empty() {
            "No commands available.".to_string()
        } else {
            lines.join("\n")
        }
    }
}
