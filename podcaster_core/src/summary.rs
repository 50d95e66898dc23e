//! Read-only projection over a finished ledger.

use serde::Serialize;
use uuid::Uuid;

use crate::message::{Cue, Speaker};
use crate::state::{ConversationState, ConversationStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeakerCounts {
    pub host: usize,
    pub guest_a: usize,
    pub guest_b: usize,
    pub user: usize,
}

impl SpeakerCounts {
    #[must_use]
    pub const fn get(&self, speaker: Speaker) -> usize {
        match speaker {
            Speaker::Host => self.host,
            Speaker::GuestA => self.guest_a,
            Speaker::GuestB => self.guest_b,
            Speaker::User => self.user,
        }
    }

    const fn bump(&mut self, speaker: Speaker) {
        match speaker {
            Speaker::Host => self.host += 1,
            Speaker::GuestA => self.guest_a += 1,
            Speaker::GuestB => self.guest_b += 1,
            Speaker::User => self.user += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.host + self.guest_a + self.guest_b + self.user
    }
}

/// Session statistics, rebuilt from the history every time it is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub session_id: Uuid,
    pub topic: String,
    pub total_turns: usize,
    pub total_exchanges: usize,
    pub speaker_counts: SpeakerCounts,
    pub user_injections: usize,
    pub user_participated: bool,
    pub final_status: ConversationStatus,
    pub interrupted: bool,
}

impl SummaryRecord {
    #[must_use]
    pub fn from_state(state: &ConversationState) -> Self {
        let mut speaker_counts = SpeakerCounts::default();
        let mut total_exchanges = 0;
        for message in state.history() {
            speaker_counts.bump(message.speaker);
            if message.cue == Cue::FollowUp {
                total_exchanges += 1;
            }
        }

        Self {
            session_id: state.id(),
            topic: state.topic().to_string(),
            total_turns: state.current_turn(),
            total_exchanges,
            speaker_counts,
            user_injections: speaker_counts.user,
            user_participated: speaker_counts.user > 0,
            final_status: state.status(),
            interrupted: state.is_interrupted(),
        }
    }
}
