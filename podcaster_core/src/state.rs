//! The conversation ledger.
//!
//! `ConversationState` is the single, append-only record of a session. It is
//! owned by the session controller and handed by `&mut` to whichever stage is
//! currently driving the conversation; agents and the input gate only ever
//! see a borrowed slice of the history.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::message::{Cue, Message, Speaker};
use crate::summary::SummaryRecord;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Initializing,
    Introduction,
    Active,
    AwaitingInput,
    Closing,
    Completed,
}

impl ConversationStatus {
    /// Whether `self -> next` is a legal lifecycle step.
    ///
    /// `Introduction -> Closing` covers an interrupt that arrives before the
    /// first exchange starts.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Initializing, Self::Introduction)
                | (Self::Introduction, Self::Active | Self::Closing)
                | (Self::Active, Self::AwaitingInput | Self::Closing)
                | (Self::AwaitingInput, Self::Active | Self::Closing)
                | (Self::Closing, Self::Completed)
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Introduction => "introduction",
            Self::Active => "active",
            Self::AwaitingInput => "awaiting_input",
            Self::Closing => "closing",
            Self::Completed => "completed",
        }
    }
}

/// One observed status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: ConversationStatus,
    pub to: ConversationStatus,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid status transition: {} -> {}", from.as_str(), to.as_str())]
    InvalidTransition {
        from: ConversationStatus,
        to: ConversationStatus,
    },

    #[error("Conversation is completed; the ledger is read-only")]
    Frozen,

    #[error("Turn limit of {limit} reached")]
    TurnLimit { limit: usize },
}

#[derive(Debug, Clone)]
pub struct ConversationState {
    id: Uuid,
    topic: String,
    status: ConversationStatus,
    current_turn: usize,
    history: Vec<Message>,
    exchanges_since_prompt: usize,
    max_turns: usize,
    status_log: Vec<StatusChange>,
    interrupted: bool,
}

impl ConversationState {
    /// Create a ledger in `Initializing`.
    ///
    /// `max_turns` is clamped to at least 2 so the closing slot can always be
    /// reserved alongside one conversational message.
    #[must_use]
    pub fn new(topic: impl Into<String>, max_turns: usize) -> Self {
        Self {
            id: Uuid::now_v7(),
            topic: topic.into(),
            status: ConversationStatus::Initializing,
            current_turn: 0,
            history: Vec::new(),
            exchanges_since_prompt: 0,
            max_turns: max_turns.max(2),
            status_log: Vec::new(),
            interrupted: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub const fn status(&self) -> ConversationStatus {
        self.status
    }

    #[must_use]
    pub const fn current_turn(&self) -> usize {
        self.current_turn
    }

    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    #[must_use]
    pub const fn exchanges_since_prompt(&self) -> usize {
        self.exchanges_since_prompt
    }

    #[must_use]
    pub const fn max_turns(&self) -> usize {
        self.max_turns
    }

    #[must_use]
    pub fn status_log(&self) -> &[StatusChange] {
        &self.status_log
    }

    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        matches!(self.status, ConversationStatus::Completed)
    }

    /// Get the last N messages from history.
    #[must_use]
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Move to `next`, rejecting any step outside the lifecycle table.
    pub fn transition(&mut self, next: ConversationStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        debug!(
            "Session {} status {} -> {}",
            self.id,
            self.status.as_str(),
            next.as_str()
        );
        self.status_log.push(StatusChange {
            from: self.status,
            to: next,
        });
        self.status = next;
        Ok(())
    }

    /// Whether `turns` more conversational messages fit while still leaving
    /// the final slot free for closing remarks.
    #[must_use]
    pub const fn has_room_for(&self, turns: usize) -> bool {
        self.current_turn + turns < self.max_turns
    }

    /// Append a message; each message consumes exactly one turn number.
    ///
    /// The last turn is reserved for the `Closing` status.
    pub fn append(
        &mut self,
        speaker: Speaker,
        cue: Cue,
        text: impl Into<String>,
    ) -> Result<&Message, LedgerError> {
        if self.is_frozen() {
            return Err(LedgerError::Frozen);
        }
        let ceiling = if self.status == ConversationStatus::Closing {
            self.max_turns
        } else {
            self.max_turns - 1
        };
        if self.current_turn >= ceiling {
            return Err(LedgerError::TurnLimit {
                limit: self.max_turns,
            });
        }

        self.current_turn += 1;
        self.history.push(Message {
            speaker,
            cue,
            text: text.into(),
            turn_number: self.current_turn,
            timestamp: Utc::now(),
        });
        let index = self.history.len() - 1;
        Ok(&self.history[index])
    }

    /// Count one completed exchange towards the next full prompt.
    pub const fn record_completed_exchange(&mut self) -> usize {
        self.exchanges_since_prompt += 1;
        self.exchanges_since_prompt
    }

    pub const fn reset_prompt_counter(&mut self) {
        self.exchanges_since_prompt = 0;
    }

    pub const fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    /// Project the ledger into a summary.
    #[must_use]
    pub fn summary(&self) -> SummaryRecord {
        SummaryRecord::from_state(self)
    }
}
