//! `Responder` implementations backed by serenity.
//!
//! Slash commands and component clicks answer through the interaction
//! endpoints; prefix commands answer with ordinary channel messages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serenity::all::{
    ChannelId, CommandInteraction, ComponentInteraction, CreateAttachment,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, EditInteractionResponse, EditMessage, Http,
    MessageId,
};

use crate::command::{Responder, SentMessage, SurfaceEditor};
use crate::message::{Attachment, Reply};
use crate::surface::Surface;

use super::render::Rendered;

fn attachment(file: &Attachment) -> CreateAttachment {
    CreateAttachment::bytes(file.data.clone(), file.filename.clone())
}

fn response_message(reply: &Reply) -> CreateInteractionResponseMessage {
    let rendered = Rendered::new(reply.surface.as_ref());
    let mut message = CreateInteractionResponseMessage::new()
        .embeds(rendered.embeds)
        .components(rendered.components)
        .ephemeral(reply.ephemeral);
    if let Some(content) = &reply.content {
        message = message.content(content.clone());
    }
    for file in &reply.attachments {
        message = message.add_file(attachment(file));
    }
    message
}

fn followup_message(reply: &Reply) -> CreateInteractionResponseFollowup {
    let rendered = Rendered::new(reply.surface.as_ref());
    let mut message = CreateInteractionResponseFollowup::new()
        .embeds(rendered.embeds)
        .components(rendered.components)
        .ephemeral(reply.ephemeral);
    if let Some(content) = &reply.content {
        message = message.content(content.clone());
    }
    for file in &reply.attachments {
        message = message.add_file(attachment(file));
    }
    message
}

fn channel_message(reply: &Reply) -> CreateMessage {
    let rendered = Rendered::new(reply.surface.as_ref());
    let mut message = CreateMessage::new()
        .embeds(rendered.embeds)
        .components(rendered.components);
    if let Some(content) = &reply.content {
        message = message.content(content.clone());
    }
    for file in &reply.attachments {
        message = message.add_file(attachment(file));
    }
    message
}

fn update_message(surface: &Surface) -> CreateInteractionResponseMessage {
    let rendered = Rendered::new(Some(surface));
    CreateInteractionResponseMessage::new()
        .content("")
        .embeds(rendered.embeds)
        .components(rendered.components)
}

fn interaction_edit(surface: &Surface) -> EditInteractionResponse {
    let rendered = Rendered::new(Some(surface));
    EditInteractionResponse::new()
        .content("")
        .embeds(rendered.embeds)
        .components(rendered.components)
}

fn message_edit(surface: &Surface) -> EditMessage {
    let rendered = Rendered::new(Some(surface));
    EditMessage::new()
        .content("")
        .embeds(rendered.embeds)
        .components(rendered.components)
}

/// Edits the original response of a slash command through its token.
struct InteractionEditor {
    http: Arc<Http>,
    interaction: CommandInteraction,
}

#[async_trait]
impl SurfaceEditor for InteractionEditor {
    async fn edit(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.interaction
            .edit_response(&self.http, interaction_edit(&surface))
            .await?;
        Ok(())
    }
}

/// Edits a bot-authored channel message.
struct MessageEditor {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

#[async_trait]
impl SurfaceEditor for MessageEditor {
    async fn edit(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.channel_id
            .edit_message(&self.http, self.message_id, message_edit(&surface))
            .await?;
        Ok(())
    }
}

pub(super) struct CommandResponder {
    http: Arc<Http>,
    interaction: CommandInteraction,
    replied: AtomicBool,
}

impl CommandResponder {
    pub(super) fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self {
            http,
            interaction,
            replied: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Responder for CommandResponder {
    async fn reply(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.replied.load(Ordering::SeqCst) {
            return self.follow_up(reply).await;
        }
        self.interaction
            .create_response(
                &self.http,
                CreateInteractionResponse::Message(response_message(&reply)),
            )
            .await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.replied.load(Ordering::SeqCst) {
            return self.reply(Reply::surface(surface)).await;
        }
        self.interaction
            .edit_response(&self.http, interaction_edit(&surface))
            .await?;
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.interaction
            .create_followup(&self.http, followup_message(&reply))
            .await?;
        Ok(())
    }

    async fn original(&self) -> Result<SentMessage, Box<dyn std::error::Error + Send + Sync>> {
        let message = self.interaction.get_response(&self.http).await?;
        Ok(SentMessage {
            message_id: message.id.get(),
            editor: Arc::new(InteractionEditor {
                http: Arc::clone(&self.http),
                interaction: self.interaction.clone(),
            }),
        })
    }
}

pub(super) struct ComponentResponder {
    http: Arc<Http>,
    interaction: ComponentInteraction,
    replied: AtomicBool,
}

impl ComponentResponder {
    pub(super) fn new(http: Arc<Http>, interaction: ComponentInteraction) -> Self {
        Self {
            http,
            interaction,
            replied: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Responder for ComponentResponder {
    async fn reply(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.replied.load(Ordering::SeqCst) {
            return self.follow_up(reply).await;
        }
        self.interaction
            .create_response(
                &self.http,
                CreateInteractionResponse::Message(response_message(&reply)),
            )
            .await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.replied.load(Ordering::SeqCst) {
            self.interaction
                .edit_response(&self.http, interaction_edit(&surface))
                .await?;
            return Ok(());
        }
        self.interaction
            .create_response(
                &self.http,
                CreateInteractionResponse::UpdateMessage(update_message(&surface)),
            )
            .await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.interaction
            .create_followup(&self.http, followup_message(&reply))
            .await?;
        Ok(())
    }

    async fn original(&self) -> Result<SentMessage, Box<dyn std::error::Error + Send + Sync>> {
        Ok(SentMessage {
            message_id: self.interaction.message.id.get(),
            editor: Arc::new(MessageEditor {
                http: Arc::clone(&self.http),
                channel_id: self.interaction.channel_id,
                message_id: self.interaction.message.id,
            }),
        })
    }
}

/// Answers a prefix command in the channel it came from.
pub(super) struct MessageResponder {
    http: Arc<Http>,
    channel_id: ChannelId,
    source: MessageId,
    first_reply: Mutex<Option<MessageId>>,
}

impl MessageResponder {
    pub(super) fn new(http: Arc<Http>, channel_id: ChannelId, source: MessageId) -> Self {
        Self {
            http,
            channel_id,
            source,
            first_reply: Mutex::new(None),
        }
    }

    fn sent(&self) -> Option<MessageId> {
        *self.first_reply.lock().unwrap()
    }
}

#[async_trait]
impl Responder for MessageResponder {
    async fn reply(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.sent().is_some() {
            return self.follow_up(reply).await;
        }
        let builder = channel_message(&reply).reference_message((self.channel_id, self.source));
        let message = self.channel_id.send_message(&self.http, builder).await?;
        *self.first_reply.lock().unwrap() = Some(message.id);
        Ok(())
    }

    async fn update(&self, surface: Surface) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let message_id = match self.sent() {
            Some(id) => id,
            None => return self.reply(Reply::surface(surface)).await,
        };
        self.channel_id
            .edit_message(&self.http, message_id, message_edit(&surface))
            .await?;
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.channel_id
            .send_message(&self.http, channel_message(&reply))
            .await?;
        Ok(())
    }

    async fn original(&self) -> Result<SentMessage, Box<dyn std::error::Error + Send + Sync>> {
        let message_id = self.sent().ok_or("no reply has been sent yet")?;
        Ok(SentMessage {
            message_id: message_id.get(),
            editor: Arc::new(MessageEditor {
                http: Arc::clone(&self.http),
                channel_id: self.channel_id,
                message_id,
            }),
        })
    }
}
