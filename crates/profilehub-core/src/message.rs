//! Transient user-facing messages.
//!
//! A message is shown until it expires or is replaced. Every message carries
//! a ticket; a delayed clear only removes the message if its ticket is still
//! the current one, so an old timer never removes a newer message.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// Identity of one shown message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub text: String,
    pub kind: MessageKind,
    pub ticket: MessageTicket,
    pub expires_at: Instant,
}

impl TransientMessage {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Holds at most one active message.
#[derive(Debug, Default)]
pub struct MessageBoard {
    current: Option<TransientMessage>,
    last_ticket: u64,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current message and returns the new ticket.
    pub fn show(
        &mut self,
        text: impl Into<String>,
        kind: MessageKind,
        duration: Duration,
        now: Instant,
    ) -> MessageTicket {
        self.last_ticket += 1;
        let ticket = MessageTicket(self.last_ticket);
        self.current = Some(TransientMessage {
            text: text.into(),
            kind,
            ticket,
            expires_at: now + duration,
        });
        ticket
    }

    /// The current message, unless it has expired.
    pub fn active(&self, now: Instant) -> Option<&TransientMessage> {
        self.current.as_ref().filter(|message| !message.is_expired(now))
    }

    /// Clears the message only if `ticket` still identifies it.
    ///
    /// Returns `true` when a message was removed.
    pub fn clear_if(&mut self, ticket: MessageTicket) -> bool {
        if self.current.as_ref().is_some_and(|m| m.ticket == ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Dismisses whatever is shown.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
