//! In-game chat.

use serde::Serialize;
use ulid::Ulid;
use unicode_normalization::UnicodeNormalization;

use super::rules::{CHAT_CAPACITY, CHAT_MAX_CHARS};
use super::state::{Game, PlayerId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// ULID; sorts by send time, used as the `after` cursor.
    pub id: String,
    pub player_id: PlayerId,
    pub username: String,
    pub text: String,
    pub sent_at_ms: i64,
}

/// Trim and NFC-normalize a message body, rejecting empty or oversized text.
pub fn normalize_chat_text(raw: &str) -> Result<String, DomainError> {
    let text: String = raw.trim().nfc().collect();
    if text.is_empty() {
        return Err(DomainError::invalid_input("message is empty"));
    }
    if text.chars().count() > CHAT_MAX_CHARS {
        return Err(DomainError::invalid_input(format!(
            "message is longer than {CHAT_MAX_CHARS} characters"
        )));
    }
    Ok(text)
}

impl Game {
    /// Append a chat message from `player_id`; oldest messages fall off.
    pub fn post_chat(
        &mut self,
        player_id: PlayerId,
        raw: &str,
        sent_at_ms: i64,
    ) -> Result<ChatMessage, DomainError> {
        let text = normalize_chat_text(raw)?;
        let username = self.require_player_mut(player_id)?.username.clone();
        let mut id = Ulid::new();
        // keep ids strictly increasing within a millisecond
        if let Some(prev) = self.chat.last().and_then(|m| Ulid::from_string(&m.id).ok()) {
            if id <= prev {
                id = prev.increment().unwrap_or(id);
            }
        }
        let message = ChatMessage {
            id: id.to_string(),
            player_id,
            username,
            text,
            sent_at_ms,
        };
        self.chat.push(message.clone());
        if self.chat.len() > CHAT_CAPACITY {
            let overflow = self.chat.len() - CHAT_CAPACITY;
            self.chat.drain(..overflow);
        }
        Ok(message)
    }

    /// Messages strictly after the `after` id, or all kept messages.
    pub fn chat_since(&self, after: Option<&str>) -> Vec<ChatMessage> {
        match after {
            Some(cursor) => self
                .chat
                .iter()
                .filter(|m| m.id.as_str() > cursor)
                .cloned()
                .collect(),
            None => self.chat.clone(),
        }
    }
}
