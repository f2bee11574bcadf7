//! [`DisplaySink`] backed by a single Discord channel message.
//!
//! The status document becomes one embed plus rows of danger-styled
//! buttons. Every update replaces the embed and all component rows.

use std::sync::Arc;

use panelwatch_core::aggregator::DisplaySink;
use panelwatch_core::errors::DisplayError;
use panelwatch_core::output::{control_rows, StatusDocument};
use serenity::all::{
    ButtonStyle, ChannelId, Colour, CreateActionRow, CreateButton, CreateEmbed, CreateMessage,
    EditMessage, Http, MessageId,
};
use serenity::http::HttpError;

/// Maximum component rows Discord accepts on one message.
const MAX_ROWS: usize = 5;

/// Build the embed for a status document.
pub fn to_embed(document: &StatusDocument) -> CreateEmbed {
    document.fields.iter().fold(
        CreateEmbed::new()
            .title(&document.title)
            .colour(Colour::new(document.colour)),
        |embed, field| embed.field(&field.name, &field.value, field.inline),
    )
}

/// Build the button rows for a status document's controls.
pub fn to_components(document: &StatusDocument) -> Vec<CreateActionRow> {
    control_rows(&document.controls)
        .into_iter()
        .take(MAX_ROWS)
        .map(|row| {
            CreateActionRow::Buttons(
                row.iter()
                    .map(|control| {
                        CreateButton::new(&control.id)
                            .label(&control.label)
                            .style(ButtonStyle::Danger)
                    })
                    .collect(),
            )
        })
        .collect()
}

/// Map a serenity error onto the sink's error type, keeping 404s distinct.
fn to_display_error(handle: u64, err: serenity::Error) -> DisplayError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
        if response.status_code.as_u16() == 404 {
            return DisplayError::NotFound(handle);
        }
    }
    DisplayError::Platform(err.to_string())
}

fn message_id(handle: u64) -> Result<MessageId, DisplayError> {
    if handle == 0 {
        return Err(DisplayError::NotFound(handle));
    }
    Ok(MessageId::new(handle))
}

/// Publishes the status document into one channel.
pub struct DiscordSink {
    http: Arc<Http>,
    channel: ChannelId,
}

impl DiscordSink {
    pub fn new(http: Arc<Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait::async_trait]
impl DisplaySink for DiscordSink {
    async fn fetch(&self, handle: u64) -> Result<(), DisplayError> {
        let id = message_id(handle)?;
        self.channel
            .message(&self.http, id)
            .await
            .map(|_| ())
            .map_err(|e| to_display_error(handle, e))
    }

    async fn publish(&self, document: &StatusDocument) -> Result<u64, DisplayError> {
        let builder = CreateMessage::new()
            .embed(to_embed(document))
            .components(to_components(document));
        let message = self
            .channel
            .send_message(&self.http, builder)
            .await
            .map_err(|e| DisplayError::Platform(e.to_string()))?;
        Ok(message.id.get())
    }

    async fn update(&self, handle: u64, document: &StatusDocument) -> Result<(), DisplayError> {
        let id = message_id(handle)?;
        let builder = EditMessage::new()
            .embed(to_embed(document))
            .components(to_components(document));
        self.channel
            .edit_message(&self.http, id, builder)
            .await
            .map(|_| ())
            .map_err(|e| to_display_error(handle, e))
    }
}
