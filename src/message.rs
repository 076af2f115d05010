use std::collections::HashMap;

use crate::format::{split_content, MESSAGE_LIMIT};
use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandScope {
    /// Guild channels only.
    Guild,
    /// Direct messages only.
    DM,
    Both,
}

impl CommandScope {
    pub fn allows(&self, is_dm: bool) -> bool {
        match self {
            CommandScope::Guild => !is_dm,
            CommandScope::DM => is_dm,
            CommandScope::Both => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    User,
    Role,
}

/// Declared argument of a command.
#[derive(Debug, Clone)]
pub struct CommandOption {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionValue {
    User(u64),
    Role(u64),
}

/// Who invoked a command and with what arguments.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub user_id: u64,
    pub username: String,
    pub user_tag: String,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub options: HashMap<String, OptionValue>,
}

impl Invocation {
    pub fn is_dm(&self) -> bool {
        self.guild_id.is_none()
    }

    pub fn user_option(&self, name: &str) -> Option<u64> {
        match self.options.get(name) {
            Some(OptionValue::User(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn role_option(&self, name: &str) -> Option<u64> {
        match self.options.get(name) {
            Some(OptionValue::Role(id)) => Some(*id),
            _ => None,
        }
    }
}

/// A click or selection on a message component.
#[derive(Debug, Clone)]
pub struct ComponentAction {
    pub custom_id: String,
    /// Selected values for select menus; empty for buttons.
    pub values: Vec<String>,
    pub user_id: u64,
    pub username: String,
    pub guild_id: Option<u64>,
    pub message_id: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Message sent in answer to a command or component interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub content: Option<String>,
    pub surface: Option<Surface>,
    pub attachments: Vec<Attachment>,
    /// Visible only to the invoking user.
    pub ephemeral: bool,
}

impl Reply {
    pub fn surface(surface: Surface) -> Self {
        Self {
            surface: Some(surface),
            ..Default::default()
        }
    }

    /// Plain public message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    /// Public text split to the message limit, one reply per chunk.
    pub fn chunked(text: &str) -> Vec<Self> {
        split_content(text, MESSAGE_LIMIT)
            .into_iter()
            .map(Self::text)
            .collect()
    }

    /// Short private message.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ephemeral: true,
            ..Default::default()
        }
    }

    pub fn with_attachment(mut self, filename: impl Into<String>, data: Vec<u8>) -> Self {
        self.attachments.push(Attachment {
            filename: filename.into(),
            data,
        });
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}
