//! Speakers, cues and the immutable message record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Host,
    GuestA,
    GuestB,
    User,
}

impl Speaker {
    /// Both guests, in speaking order.
    pub const GUESTS: [Self; 2] = [Self::GuestA, Self::GuestB];

    #[must_use]
    pub const fn is_guest(self) -> bool {
        matches!(self, Self::GuestA | Self::GuestB)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::GuestA => "guest_a",
            Self::GuestB => "guest_b",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a speaker was asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Introduction,
    Question,
    Answer,
    FollowUp,
    Interjection,
    Acknowledgement,
    Reaction,
    Closing,
}

/// A single message in the conversation.
///
/// Created only by [`crate::ConversationState::append`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub cue: Cue,
    pub text: String,
    pub turn_number: usize,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Turn {}] {}: {}", self.turn_number, self.speaker, self.text)
    }
}
