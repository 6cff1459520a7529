//! Symptom chat screen.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::ScreenLifetime;
use crate::matcher::ChatResponder;
use crate::models::{ChatMessage, MessageIdClock, Originator};

/// A bot reply that has been requested but not delivered yet.
pub struct PendingReply {
    input: String,
    responder: Arc<ChatResponder>,
    token: CancellationToken,
}

impl PendingReply {
    /// Wait for the reply. `None` if the chat screen was closed in the meantime.
    pub async fn resolve(self) -> Option<String> {
        self.responder.reply(&self.input, &self.token).await
    }
}

/// Chat screen controller. Messages live only as long as the screen.
pub struct ChatScreen {
    responder: Arc<ChatResponder>,
    messages: Vec<ChatMessage>,
    clock: MessageIdClock,
    lifetime: ScreenLifetime,
}

impl ChatScreen {
    pub fn mount(responder: Arc<ChatResponder>) -> Self {
        Self {
            responder,
            messages: Vec::new(),
            clock: MessageIdClock::new(),
            lifetime: ScreenLifetime::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_mounted(&self) -> bool {
        self.lifetime.is_mounted()
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }

    /// Post the user's message and start the bot reply.
    ///
    /// Blank input is ignored.
    pub fn send(&mut self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() || !self.is_mounted() {
            return None;
        }

        self.push(text.to_string(), Originator::User);
        info!(messages = self.messages.len(), "chat message sent");

        Some(PendingReply {
            input: text.to_string(),
            responder: self.responder.clone(),
            token: self.lifetime.child_token(),
        })
    }

    /// Append a bot reply. Ignored once the screen is unmounted.
    pub fn receive_reply(&mut self, text: String) -> Option<&ChatMessage> {
        if !self.is_mounted() {
            debug!("dropping chat reply for unmounted screen");
            return None;
        }
        Some(self.push(text, Originator::Bot))
    }

    /// Send `text` and wait for the bot's answer.
    pub async fn send_and_wait(&mut self, text: &str) -> Option<ChatMessage> {
        let reply = self.send(text)?.resolve().await?;
        self.receive_reply(reply).cloned()
    }

    fn push(&mut self, text: String, originator: Originator) -> &ChatMessage {
        self.messages.push(ChatMessage {
            id: self.clock.next_id(),
            text,
            originator,
        });
        &self.messages[self.messages.len() - 1]
    }
}
