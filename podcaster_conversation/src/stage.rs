//! Everything a session needs besides the ledger itself.
//!
//! The stage never owns the ledger: every method takes the
//! [`ConversationState`] by `&mut`, so the controller stays the only writer.

use std::io::Write;
use std::time::Duration;

use podcaster_core::{
    ConversationState, ConversationStatus, Cue, DEFAULT_MAX_TURNS, ResponseRequest, Speaker,
    SpeakerAgent,
};
use tracing::{debug, warn};

use crate::error::ConversationError;
use crate::formatter::{Cast, ConsoleEvent, Formatter};
use crate::input::{InputGate, InputOutcome, InputSource, PromptKind};

/// Pacing and limits for one session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Hard ceiling on turns, closing remarks included.
    pub max_turns: usize,
    /// Completed exchanges between full prompts.
    pub exchanges_per_prompt: usize,
    /// Messages handed to agents as recent context.
    pub context_window: usize,
    /// Delay after each rendered message.
    pub pacing: Duration,
    /// Longest wait for one agent response before it counts as failed.
    pub response_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            exchanges_per_prompt: 3,
            context_window: 5,
            pacing: Duration::from_millis(500),
            response_timeout: Duration::from_secs(60),
        }
    }
}

impl SessionSettings {
    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[must_use]
    pub const fn with_exchanges_per_prompt(mut self, exchanges: usize) -> Self {
        self.exchanges_per_prompt = exchanges;
        self
    }

    #[must_use]
    pub const fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }

    #[must_use]
    pub const fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub const fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

pub struct Stage<A, I, W> {
    agent: A,
    gate: InputGate<I>,
    out: W,
    formatter: Formatter,
    cast: Cast,
    settings: SessionSettings,
}

impl<A, I, W> Stage<A, I, W>
where
    A: SpeakerAgent,
    I: InputSource,
    W: Write + Send,
{
    pub const fn new(
        agent: A,
        gate: InputGate<I>,
        out: W,
        cast: Cast,
        settings: SessionSettings,
    ) -> Self {
        Self {
            agent,
            gate,
            out,
            formatter: Formatter,
            cast,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub const fn cast(&self) -> &Cast {
        &self.cast
    }

    #[must_use]
    pub const fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Render one event to the output.
    pub fn emit(&mut self, event: &ConsoleEvent<'_>) -> Result<(), ConversationError> {
        writeln!(self.out, "{}", self.formatter.render(event))?;
        self.out.flush()?;
        Ok(())
    }

    /// Ask `speaker` for a line, append it and render it.
    ///
    /// An agent failure, or no response within `response_timeout`, never
    /// aborts the session: the failure is reported and a notice is appended
    /// in place of the line.
    pub async fn speak(
        &mut self,
        state: &mut ConversationState,
        speaker: Speaker,
        cue: Cue,
        user_text: Option<&str>,
    ) -> Result<(), ConversationError> {
        let generated = {
            let request = ResponseRequest {
                speaker,
                cue,
                topic: state.topic(),
                turn: state.current_turn() + 1,
                recent_context: state.recent(self.settings.context_window),
                user_text,
            };
            let timeout = self.settings.response_timeout;
            tokio::time::timeout(timeout, self.agent.generate_response(request))
                .await
                .unwrap_or_else(|_| {
                    Err(anyhow::anyhow!(
                        "no response within {}s",
                        timeout.as_secs_f32()
                    ))
                })
        };

        let text = match generated {
            Ok(text) => text,
            Err(e) => {
                warn!("Agent for {speaker} failed on {cue:?}: {e:#}");
                let notice = format!("{} could not respond: {e}", self.cast.name(speaker));
                self.emit(&ConsoleEvent::Error(&notice))?;
                format!("[{notice}]")
            }
        };

        self.record(state, speaker, cue, text)?;
        debug!("Turn {} by {speaker}", state.current_turn());
        self.pace().await;
        Ok(())
    }

    /// Append text that did not come from an agent (the listener's own words).
    pub fn record(
        &mut self,
        state: &mut ConversationState,
        speaker: Speaker,
        cue: Cue,
        text: String,
    ) -> Result<(), ConversationError> {
        let message = state.append(speaker, cue, text)?;
        let rendered = self.formatter.render(&ConsoleEvent::Message {
            message,
            name: self.cast.name(speaker),
        });
        writeln!(self.out, "{rendered}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Open an input window.
    ///
    /// The ledger sits in `AwaitingInput` while waiting. Silence or a blank
    /// line returns it to `Active`; an exit or an interjection leaves it in
    /// `AwaitingInput` for the caller to resolve.
    pub async fn pause(
        &mut self,
        state: &mut ConversationState,
        kind: PromptKind,
    ) -> Result<InputOutcome, ConversationError> {
        state.transition(ConversationStatus::AwaitingInput)?;
        match kind {
            PromptKind::Quick => self.emit(&ConsoleEvent::QuickPause)?,
            PromptKind::Full => self.emit(&ConsoleEvent::UserPrompt)?,
        }

        let outcome = self.gate.await_input(kind).await;
        debug!("{kind:?} pause resolved to {outcome:?}");

        match outcome {
            InputOutcome::Timeout => {
                self.emit(&ConsoleEvent::Continuing)?;
                state.transition(ConversationStatus::Active)?;
            }
            InputOutcome::BlankContinue => state.transition(ConversationStatus::Active)?,
            InputOutcome::Exit | InputOutcome::Content(_) => {}
        }
        Ok(outcome)
    }

    async fn pace(&self) {
        if !self.settings.pacing.is_zero() {
            tokio::time::sleep(self.settings.pacing).await;
        }
    }
}
