//! Session controller: introduction, exchange loop, closing.
//!
//! The controller owns the ledger and is its only writer. The exchange loop
//! runs as one future raced against an interrupt; when the interrupt wins
//! the loop future is dropped at its current suspension point, which is
//! always between two ledger appends, and the session goes straight to
//! closing.

use std::future::Future;
use std::io::Write;

use podcaster_core::{
    ConversationState, ConversationStatus, Cue, Speaker, SpeakerAgent, SummaryRecord,
};
use tracing::{error, info, warn};

use crate::error::ConversationError;
use crate::exchange::{ExchangeResult, exchange_budget, run_exchange};
use crate::formatter::{Cast, ConsoleEvent};
use crate::injection::{IntegrationResult, integrate};
use crate::input::{InputGate, InputSource};
use crate::stage::{SessionSettings, Stage};

/// Why the exchange loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    UserExit,
    TurnLimit,
}

pub struct SessionController<A, I, W> {
    stage: Stage<A, I, W>,
    state: ConversationState,
}

impl<A, I, W> SessionController<A, I, W>
where
    A: SpeakerAgent,
    I: InputSource,
    W: Write + Send,
{
    pub fn new(
        topic: impl Into<String>,
        cast: Cast,
        agent: A,
        gate: InputGate<I>,
        out: W,
        settings: SessionSettings,
    ) -> Self {
        let state = ConversationState::new(topic, settings.max_turns);
        info!(
            "Conversation session {} created for topic: {}",
            state.id(),
            state.topic()
        );
        Self {
            stage: Stage::new(agent, gate, out, cast, settings),
            state,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ConversationState {
        &self.state
    }

    #[must_use]
    pub const fn output(&self) -> &W {
        self.stage.output()
    }

    pub fn into_output(self) -> W {
        self.stage.into_output()
    }

    /// Session statistics; `None` until the session has completed.
    #[must_use]
    pub fn get_summary(&self) -> Option<SummaryRecord> {
        self.state.is_frozen().then(|| self.state.summary())
    }

    /// Run the session to completion, ending early on Ctrl+C.
    ///
    /// Returns `true` when the session ended normally (listener exit or turn
    /// limit), `false` when it was interrupted or degraded by an error.
    pub async fn start_conversation(&mut self) -> bool {
        self.start_conversation_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the session, treating completion of `interrupt` as a keyboard
    /// interrupt.
    pub async fn start_conversation_until<F>(&mut self, interrupt: F) -> bool
    where
        F: Future<Output = ()>,
    {
        if self.state.status() != ConversationStatus::Initializing {
            warn!("Session {} has already been started", self.state.id());
            return false;
        }

        let completed = match self.open() {
            Err(e) => {
                error!("Failed to open session: {e}");
                false
            }
            Ok(()) => {
                let outcome = tokio::select! {
                    biased;

                    () = interrupt => None,
                    result = run_session(&mut self.stage, &mut self.state) => Some(result),
                };
                self.settle(outcome)
            }
        };

        self.close().await;
        info!(
            "Conversation completed after {} turns",
            self.state.current_turn()
        );
        completed
    }

    fn open(&mut self) -> Result<(), ConversationError> {
        self.state.transition(ConversationStatus::Introduction)?;
        let topic = self.state.topic().to_string();
        let cast = self.stage.cast().clone();
        self.stage.emit(&ConsoleEvent::Welcome {
            topic: &topic,
            cast: &cast,
        })
    }

    fn settle(&mut self, outcome: Option<Result<EndReason, ConversationError>>) -> bool {
        match outcome {
            None => {
                info!("Conversation interrupted by user");
                self.state.mark_interrupted();
                self.report(ConsoleEvent::System(
                    "Podcast interrupted. Ending gracefully...",
                ));
                false
            }
            Some(Ok(reason)) => {
                info!("Exchange loop ended: {reason:?}");
                true
            }
            Some(Err(e)) => {
                error!("Error during conversation: {e}");
                let notice = format!("An error occurred: {e}");
                self.report(ConsoleEvent::Error(&notice));
                false
            }
        }
    }

    /// Closing remarks, then `Completed`. Failures here are logged only.
    async fn close(&mut self) {
        if self.state.status() != ConversationStatus::Closing {
            if let Err(e) = self.state.transition(ConversationStatus::Closing) {
                error!("Cannot move to closing: {e}");
            }
        }

        if self.state.status() == ConversationStatus::Closing {
            if let Err(e) = self
                .stage
                .speak(&mut self.state, Speaker::Host, Cue::Closing, None)
                .await
            {
                warn!("Closing remarks failed: {e}");
            }
            if let Err(e) = self.state.transition(ConversationStatus::Completed) {
                error!("Cannot complete session: {e}");
            }
        }

        self.report(ConsoleEvent::Goodbye);
    }

    fn report(&mut self, event: ConsoleEvent<'_>) {
        if let Err(e) = self.stage.emit(&event) {
            warn!("Failed to write to output: {e}");
        }
    }
}

/// Introduction followed by exchanges until the listener leaves or the turn
/// budget runs out. Leaves the ledger in `Closing`.
async fn run_session<A, I, W>(
    stage: &mut Stage<A, I, W>,
    state: &mut ConversationState,
) -> Result<EndReason, ConversationError>
where
    A: SpeakerAgent,
    I: InputSource,
    W: Write + Send,
{
    stage
        .speak(state, Speaker::Host, Cue::Introduction, None)
        .await?;
    state.transition(ConversationStatus::Active)?;

    let reason = loop {
        if !state.has_room_for(exchange_budget(state, stage.settings())) {
            warn!(
                "Reached maximum turn limit at turn {}, ending conversation",
                state.current_turn()
            );
            break EndReason::TurnLimit;
        }

        match run_exchange(stage, state).await? {
            ExchangeResult::Continued => {}
            ExchangeResult::UserExited => break EndReason::UserExit,
            ExchangeResult::UserInjected(text) => match integrate(stage, state, text).await? {
                IntegrationResult::Integrated => {}
                IntegrationResult::UserExited => break EndReason::UserExit,
                IntegrationResult::OutOfTurns => break EndReason::TurnLimit,
            },
        }
    };

    state.transition(ConversationStatus::Closing)?;
    Ok(reason)
}
