//! Folding a listener interjection into the dialogue.

use std::io::Write;

use podcaster_core::{
    ConversationState, ConversationStatus, Cue, Speaker, SpeakerAgent, TURNS_PER_INJECTION,
};
use tracing::{debug, info, warn};

use crate::error::ConversationError;
use crate::input::{InputOutcome, InputSource, PromptKind};
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationResult {
    Integrated,
    UserExited,
    /// Not enough turns left to integrate without crowding out the closing.
    OutOfTurns,
}

/// Record the listener's words, then let the host acknowledge them and both
/// guests react.
///
/// A quick pause follows each guest reaction as long as another interjection
/// would still fit before the closing slot; near the turn limit the pause is
/// skipped rather than offered and then ignored. If the listener chimes in
/// again, the remaining reactions are dropped and the new text is integrated
/// the same way before control returns to the caller.
pub async fn integrate<A, I, W>(
    stage: &mut Stage<A, I, W>,
    state: &mut ConversationState,
    text: String,
) -> Result<IntegrationResult, ConversationError>
where
    A: SpeakerAgent,
    I: InputSource,
    W: Write + Send,
{
    let mut pending = Some(text);

    while let Some(text) = pending.take() {
        if state.status() == ConversationStatus::AwaitingInput {
            state.transition(ConversationStatus::Active)?;
        }
        if !state.has_room_for(TURNS_PER_INJECTION) {
            warn!(
                "Turn {} of {}: no room to integrate listener input",
                state.current_turn(),
                state.max_turns()
            );
            return Ok(IntegrationResult::OutOfTurns);
        }

        info!("Integrating listener input at turn {}", state.current_turn() + 1);
        stage.record(state, Speaker::User, Cue::Interjection, text.clone())?;
        stage
            .speak(state, Speaker::Host, Cue::Acknowledgement, Some(text.as_str()))
            .await?;

        for guest in Speaker::GUESTS {
            stage
                .speak(state, guest, Cue::Reaction, Some(text.as_str()))
                .await?;
            if !state.has_room_for(TURNS_PER_INJECTION) {
                debug!("No room for another interjection after {guest}; skipping pause");
                continue;
            }
            match stage.pause(state, PromptKind::Quick).await? {
                InputOutcome::Timeout | InputOutcome::BlankContinue => {}
                InputOutcome::Exit => return Ok(IntegrationResult::UserExited),
                InputOutcome::Content(again) => {
                    pending = Some(again);
                    break;
                }
            }
        }
    }

    Ok(IntegrationResult::Integrated)
}
