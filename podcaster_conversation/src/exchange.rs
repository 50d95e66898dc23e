//! One exchange: host question, two guest answers, host follow-up.

use std::io::Write;

use podcaster_core::{
    ConversationState, Cue, Speaker, SpeakerAgent, TURNS_PER_EXCHANGE, TURNS_PER_INJECTION,
};
use tracing::debug;

use crate::error::ConversationError;
use crate::input::{InputOutcome, InputSource, PromptKind};
use crate::stage::{SessionSettings, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeResult {
    Continued,
    UserExited,
    /// The listener spoke up; the rest of the exchange was skipped.
    UserInjected(String),
}

impl ExchangeResult {
    /// `None` when the outcome lets the exchange carry on.
    fn interruption(outcome: InputOutcome) -> Option<Self> {
        match outcome {
            InputOutcome::Timeout | InputOutcome::BlankContinue => None,
            InputOutcome::Exit => Some(Self::UserExited),
            InputOutcome::Content(text) => Some(Self::UserInjected(text)),
        }
    }
}

/// Turns the next exchange may use, counting an interjection at its last
/// pause: after the follow-up when a full prompt is due, otherwise after the
/// second guest.
#[must_use]
pub const fn exchange_budget(state: &ConversationState, settings: &SessionSettings) -> usize {
    let prompt_due = state.exchanges_since_prompt() + 1 >= settings.exchanges_per_prompt;
    let before_last_pause = if prompt_due {
        TURNS_PER_EXCHANGE
    } else {
        TURNS_PER_EXCHANGE - 1
    };
    before_last_pause + TURNS_PER_INJECTION
}

/// Run one exchange against the ledger.
///
/// Each of the first three turns is followed by a quick pause; the follow-up
/// is not, since the next exchange opens with one. Every
/// `exchanges_per_prompt` completed exchanges a full prompt is shown and the
/// counter resets whatever the listener answers.
pub async fn run_exchange<A, I, W>(
    stage: &mut Stage<A, I, W>,
    state: &mut ConversationState,
) -> Result<ExchangeResult, ConversationError>
where
    A: SpeakerAgent,
    I: InputSource,
    W: Write + Send,
{
    let steps = [
        (Speaker::Host, Cue::Question),
        (Speaker::GuestA, Cue::Answer),
        (Speaker::GuestB, Cue::Answer),
    ];

    for (speaker, cue) in steps {
        stage.speak(state, speaker, cue, None).await?;
        let outcome = stage.pause(state, PromptKind::Quick).await?;
        if let Some(result) = ExchangeResult::interruption(outcome) {
            debug!("Exchange cut short after {speaker}: {result:?}");
            return Ok(result);
        }
    }

    stage.speak(state, Speaker::Host, Cue::FollowUp, None).await?;

    let completed = state.record_completed_exchange();
    if completed < stage.settings().exchanges_per_prompt {
        return Ok(ExchangeResult::Continued);
    }

    state.reset_prompt_counter();
    let outcome = stage.pause(state, PromptKind::Full).await?;
    Ok(ExchangeResult::interruption(outcome).unwrap_or(ExchangeResult::Continued))
}
