//! In-memory stand-ins for the Discord side of commands.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::cdn::Cdn;
use crate::command::{CommandContext, Responder, SentMessage, SurfaceEditor};
use crate::discord_api::ApiError;
use crate::fetch::{EntityFetcher, MemberRecord, RoleRecord, UserRecord};
use crate::message::{ComponentAction, Invocation, Reply};
use crate::surface::Surface;

#[derive(Default)]
pub struct FakeFetcher {
    pub users: HashMap<u64, UserRecord>,
    pub roles: HashMap<(u64, u64), RoleRecord>,
    pub members: HashMap<u64, Vec<MemberRecord>>,
    pub fail: bool,
    /// Fails only member listing, like a missing members intent.
    pub fail_members: bool,
}

impl FakeFetcher {
    fn check(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail {
            return Err(Box::new(ApiError("Discord API returned HTTP 500".to_string())));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityFetcher for FakeFetcher {
    async fn user(
        &self,
        user_id: u64,
    ) -> Result<Option<UserRecord>, Box<dyn std::error::Error + Send + Sync>> {
        self.check()?;
        Ok(self.users.get(&user_id).cloned())
    }

    async fn role(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Option<RoleRecord>, Box<dyn std::error::Error + Send + Sync>> {
        self.check()?;
        Ok(self.roles.get(&(guild_id, role_id)).cloned())
    }

    async fn role_members(
        &self,
        _guild_id: u64,
        role_id: u64,
    ) -> Result<Vec<MemberRecord>, Box<dyn std::error::Error + Send + Sync>> {
        self.check()?;
        if self.fail_members {
            return Err(Box::new(ApiError("Discord API returned HTTP 403".to_string())));
        }
        Ok(self.members.get(&role_id).cloned().unwrap_or_default())
    }
}

pub fn context(fetcher: FakeFetcher) -> CommandContext {
    CommandContext {
        fetcher: Arc::new(fetcher),
        cdn: Cdn::default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Reply(Reply),
    Update(Surface),
    FollowUp(Reply),
}

/// Collects edits made after the original answer.
#[derive(Default)]
pub struct RecordingEditor {
    pub edits: Mutex<Vec<Surface>>,
}

#[async_trait]
impl SurfaceEditor for RecordingEditor {
    async fn edit(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.edits.lock().unwrap().push(surface);
        Ok(())
    }
}

pub struct RecordingResponder {
    pub sent: Mutex<Vec<Sent>>,
    pub message_id: u64,
    pub editor: Arc<RecordingEditor>,
    /// `original()` waits for a permit on this before answering.
    pub original_gate: Option<Arc<Notify>>,
    pub fail_original: bool,
}

impl RecordingResponder {
    pub fn new(message_id: u64) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            message_id,
            editor: Arc::new(RecordingEditor::default()),
            original_gate: None,
            fail_original: false,
        }
    }

    pub fn gated(message_id: u64, gate: Arc<Notify>) -> Self {
        Self {
            original_gate: Some(gate),
            ..Self::new(message_id)
        }
    }

    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn reply(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sent.lock().unwrap().push(Sent::Reply(reply));
        Ok(())
    }

    async fn update(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sent.lock().unwrap().push(Sent::Update(surface));
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sent.lock().unwrap().push(Sent::FollowUp(reply));
        Ok(())
    }

    async fn original(&self) -> Result<SentMessage, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(gate) = &self.original_gate {
            gate.notified().await;
        }
        if self.fail_original {
            return Err(Box::new(ApiError("Discord API returned HTTP 404".to_string())));
        }
        Ok(SentMessage {
            message_id: self.message_id,
            editor: self.editor.clone(),
        })
    }
}

pub fn invocation(user_id: u64, username: &str) -> Invocation {
    Invocation {
        user_id,
        username: username.to_string(),
        user_tag: username.to_string(),
        guild_id: Some(500),
        channel_id: 600,
        options: HashMap::new(),
    }
}

pub fn button(user_id: u64, message_id: u64, custom_id: &str) -> ComponentAction {
    ComponentAction {
        custom_id: custom_id.to_string(),
        values: Vec::new(),
        user_id,
        username: format!("user{}", user_id),
        guild_id: Some(500),
        message_id,
    }
}

pub fn select(user_id: u64, message_id: u64, custom_id: &str, value: &str) -> ComponentAction {
    ComponentAction {
        values: vec![value.to_string()],
        ..button(user_id, message_id, custom_id)
    }
}
