//! Deterministic doubles for driving a session without a terminal or a model.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use podcaster_core::{Cue, ResponseRequest, Speaker, SpeakerAgent};

use crate::input::{InputSource, PromptKind};

/// One scripted reaction of the listener.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// A line typed immediately.
    Line(String),
    /// A line typed after a delay.
    Delayed(Duration, String),
    /// Nothing typed; a quick pause times out.
    Silence,
    /// The input source fails.
    Fail,
}

impl ScriptStep {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }
}

/// Input source that replays a script, one step per pause.
///
/// Once the script is exhausted the source reports closed, unless it was
/// built with [`ScriptedInput::idle_listener`].
#[derive(Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<ScriptStep>,
    idle_listener: bool,
    prompts: Arc<Mutex<Vec<PromptKind>>>,
}

impl ScriptedInput {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A listener who never speaks: quick pauses time out and full prompts
    /// are answered with a blank line.
    #[must_use]
    pub fn idle_listener() -> Self {
        Self {
            idle_listener: true,
            ..Self::default()
        }
    }

    /// Steps played before falling back to idle listening.
    #[must_use]
    pub fn then_idle(mut self) -> Self {
        self.idle_listener = true;
        self
    }

    /// Shared log of every pause kind the source was asked for.
    #[must_use]
    pub fn prompt_log(&self) -> Arc<Mutex<Vec<PromptKind>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn next_line(&mut self, kind: PromptKind) -> Option<io::Result<String>> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(kind);
        }

        match self.steps.pop_front() {
            Some(ScriptStep::Line(line)) => Some(Ok(line)),
            Some(ScriptStep::Delayed(delay, line)) => {
                tokio::time::sleep(delay).await;
                Some(Ok(line))
            }
            Some(ScriptStep::Silence) => std::future::pending().await,
            Some(ScriptStep::Fail) => Some(Err(io::Error::other("scripted input failure"))),
            None if self.idle_listener => match kind {
                PromptKind::Quick => std::future::pending().await,
                PromptKind::Full => Some(Ok(String::new())),
            },
            None => None,
        }
    }
}

/// What an agent was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub speaker: Speaker,
    pub cue: Cue,
    pub turn: usize,
    pub context_len: usize,
    pub user_text: Option<String>,
}

/// Agent that answers with a line naming the speaker, cue and turn.
#[derive(Debug, Default)]
pub struct EchoAgent {
    fail_for: Option<Speaker>,
    stall_on: Option<Cue>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl EchoAgent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request for `speaker` fails.
    #[must_use]
    pub fn failing_for(speaker: Speaker) -> Self {
        Self {
            fail_for: Some(speaker),
            ..Self::default()
        }
    }

    /// Every request for `cue` never completes.
    #[must_use]
    pub fn stalling_on(cue: Cue) -> Self {
        Self {
            stall_on: Some(cue),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn request_log(&self) -> Arc<Mutex<Vec<RecordedRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl SpeakerAgent for EchoAgent {
    async fn generate_response(&self, request: ResponseRequest<'_>) -> anyhow::Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                speaker: request.speaker,
                cue: request.cue,
                turn: request.turn,
                context_len: request.recent_context.len(),
                user_text: request.user_text.map(str::to_string),
            });
        }

        if self.stall_on == Some(request.cue) {
            std::future::pending::<()>().await;
        }
        if self.fail_for == Some(request.speaker) {
            anyhow::bail!("{} is unavailable", request.speaker);
        }
        Ok(format!(
            "{} {:?} at turn {}",
            request.speaker, request.cue, request.turn
        ))
    }
}
