//! Bounded-time windows for listener input.
//!
//! A quick pause races the next input line against a timer; whichever
//! finishes first decides the outcome and the other future is dropped.
//! Lines are read on a dedicated thread and handed over through a channel,
//! so dropping the losing read never loses a line: it is simply picked up
//! at the next pause.

use std::io::{self, BufRead};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Words that end the session, matched case-insensitively as whole input.
pub const EXIT_WORDS: [&str; 5] = ["stop", "exit", "quit", "end", "bye"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Short window after a single speaker turn.
    Quick,
    /// Explicit invitation every few exchanges; waits for a line.
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Timeout,
    BlankContinue,
    Exit,
    Content(String),
}

/// How quick pauses behave on this input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickPauseMode {
    /// Continue automatically once the window elapses.
    Timed(Duration),
    /// No timer: the pause blocks until a line arrives.
    Blocking,
}

impl QuickPauseMode {
    /// `0` selects [`QuickPauseMode::Blocking`].
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::Blocking
        } else {
            Self::Timed(Duration::from_millis(ms))
        }
    }
}

/// Classify one raw input line.
#[must_use]
pub fn classify(line: &str) -> InputOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        InputOutcome::BlankContinue
    } else if EXIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
        InputOutcome::Exit
    } else {
        InputOutcome::Content(trimmed.to_string())
    }
}

/// A stream of listener input lines.
///
/// `next_line` must be cancel safe: if the returned future is dropped before
/// completing, no line may be lost.
#[async_trait]
pub trait InputSource: Send {
    /// Next line of input; `None` once the source is closed.
    async fn next_line(&mut self, kind: PromptKind) -> Option<io::Result<String>>;
}

/// Standard input, read line by line on a background thread.
pub struct StdinSource {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl StdinSource {
    /// Start the reader thread.
    ///
    /// The thread is detached; it ends when stdin closes or the receiver is
    /// dropped, and never keeps the runtime from shutting down.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel(16);
        std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
                debug!("stdin reader finished");
            })?;
        Ok(Self { rx })
    }
}

#[async_trait]
impl InputSource for StdinSource {
    async fn next_line(&mut self, _kind: PromptKind) -> Option<io::Result<String>> {
        self.rx.recv().await
    }
}

pub struct InputGate<I> {
    source: I,
    quick: QuickPauseMode,
}

impl<I> InputGate<I>
where
    I: InputSource,
{
    pub const fn new(source: I, quick: QuickPauseMode) -> Self {
        Self { source, quick }
    }

    #[must_use]
    pub const fn quick_pause_mode(&self) -> QuickPauseMode {
        self.quick
    }

    /// Wait for the listener.
    ///
    /// Never appends to the ledger. A failed or closed source resolves to
    /// [`InputOutcome::Exit`] so the session can always wind down.
    pub async fn await_input(&mut self, kind: PromptKind) -> InputOutcome {
        let received = match (kind, self.quick) {
            (PromptKind::Quick, QuickPauseMode::Timed(window)) => {
                tokio::select! {
                    biased;

                    line = self.source.next_line(kind) => line,

                    () = tokio::time::sleep(window) => {
                        debug!("Quick pause elapsed after {window:?}");
                        return InputOutcome::Timeout;
                    }
                }
            }
            _ => self.source.next_line(kind).await,
        };

        match received {
            Some(Ok(line)) => classify(&line),
            Some(Err(e)) => {
                warn!("Input source failed: {e}; ending the session");
                InputOutcome::Exit
            }
            None => {
                info!("Input source closed; ending the session");
                InputOutcome::Exit
            }
        }
    }
}
