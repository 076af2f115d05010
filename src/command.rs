use std::sync::Arc;

use async_trait::async_trait;

use crate::cdn::Cdn;
use crate::fetch::EntityFetcher;
use crate::message::{CommandOption, CommandScope, ComponentAction, Invocation, Reply};
use crate::surface::Surface;

/// Rewrites a message after the interaction that produced it has been answered.
#[async_trait]
pub trait SurfaceEditor: Send + Sync {
    async fn edit(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// The message posted by a `Responder::reply`.
pub struct SentMessage {
    pub message_id: u64,
    pub editor: Arc<dyn SurfaceEditor>,
}

/// Outbound side of a single interaction.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Answer with a new message.
    async fn reply(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Replace the message the interaction came from.
    async fn update(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Additional message after the first answer.
    async fn follow_up(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// The message posted by `reply`.
    async fn original(&self) -> Result<SentMessage, Box<dyn std::error::Error + Send + Sync>>;
}

/// Shared services handed to every command.
pub struct CommandContext {
    pub fetcher: Arc<dyn EntityFetcher>,
    pub cdn: Cdn,
}

#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn scope(&self) -> CommandScope;

    /// Extra names accepted for prefix commands.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn options(&self) -> Vec<CommandOption> {
        Vec::new()
    }

    async fn execute(
        &self,
        inv: &Invocation,
        ctx: &CommandContext,
        responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Plain-text rendering for prefix commands, one reply per message.
    /// The first is sent as a reply, the rest as follow-ups. `None` means the
    /// command answers through `execute`.
    async fn execute_text(
        &self,
        _inv: &Invocation,
        _ctx: &CommandContext,
    ) -> Result<Option<Vec<Reply>>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(None)
    }

    fn handles_component(&self, _custom_id: &str) -> bool {
        false
    }

    async fn handle_component(
        &self,
        _action: &ComponentAction,
        _ctx: &CommandContext,
        _responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register(&mut self, command: Box<dyn Command>) {
        log::info!("Registered command: {}", command.name());
        self.commands.push(command);
    }

    pub fn find_by_command(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|c| c.name() == name || c.aliases().contains(&name))
            .map(|c| c.as_ref())
    }

    pub fn find_by_component(&self, custom_id: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|c| c.handles_component(custom_id))
            .map(|c| c.as_ref())
    }

    pub fn all(&self) -> &[Box<dyn Command>] {
        &self.commands
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        name: &'static str,
        aliases: &'static [&'static str],
        prefix: &'static str,
    }

    #[async_trait]
    impl Command for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "test"
        }

        fn scope(&self) -> CommandScope {
            CommandScope::Both
        }

        fn aliases(&self) -> &[&str] {
            self.aliases
        }

        async fn execute(
            &self,
            _inv: &Invocation,
            _ctx: &CommandContext,
            _responder: &dyn Responder,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }

        fn handles_component(&self, custom_id: &str) -> bool {
            custom_id.starts_with(self.prefix)
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(Named {
            name: "showcase",
            aliases: &["cv2"],
            prefix: "demo_",
        }));
        registry.register(Box::new(Named {
            name: "roleinfo",
            aliases: &[],
            prefix: "role_",
        }));
        registry
    }

    #[test]
    fn test_find_by_name_and_alias() {
        let registry = registry();
        assert_eq!(registry.find_by_command("showcase").unwrap().name(), "showcase");
        assert_eq!(registry.find_by_command("cv2").unwrap().name(), "showcase");
        assert_eq!(registry.find_by_command("roleinfo").unwrap().name(), "roleinfo");
        assert!(registry.find_by_command("nope").is_none());
    }

    #[test]
    fn test_find_by_component() {
        let registry = registry();
        assert_eq!(
            registry.find_by_component("role_members_1").unwrap().name(),
            "roleinfo"
        );
        assert_eq!(
            registry.find_by_component("demo_primary").unwrap().name(),
            "showcase"
        );
        assert!(registry.find_by_component("other").is_none());
        assert_eq!(registry.all().len(), 2);
    }
}
