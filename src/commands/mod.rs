mod roleinfo;
mod showcase;
mod userinfo;

use std::sync::Arc;

use crate::command::CommandRegistry;
use crate::config::Config;
use crate::session::SessionTracker;
use crate::surface::Surface;

/// Accent for entities without a color of their own.
pub const DEFAULT_ACCENT: u32 = 0x5865F2;
const ERROR_ACCENT: u32 = 0xFF0000;

/// Red "Error" card shown when a lookup fails.
pub fn error_surface(description: &str, err: impl std::fmt::Display) -> Surface {
    Surface::new(ERROR_ACCENT)
        .titled("Error")
        .text(description)
        .field("Error Details", format!("`{}`", err), false)
}

pub fn build_registry(config: &Config, tracker: Arc<SessionTracker>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    if config.is_command_enabled("showcase") {
        registry.register(Box::new(showcase::ShowcaseCommand::new(
            tracker,
            config.showcase.session_timeout(),
            config.showcase.recent_actions,
        )));
    }
    if config.is_command_enabled("roleinfo") {
        registry.register(Box::new(roleinfo::RoleInfoCommand));
    }
    if config.is_command_enabled("userinfo") {
        registry.register(Box::new(userinfo::UserInfoCommand));
    }

    registry
}
