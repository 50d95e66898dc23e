#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Turn-taking orchestration for a hosted multi-party conversation.
//!
//! A session alternates a fixed four-step exchange (host question, two guest
//! answers, host follow-up) with short windows in which the listener may
//! speak up. Anything the listener says is folded back into the dialogue
//! before the next exchange starts.
//!
//! # Key Pieces
//! - [`InputGate`]: bounded-time input windows, classified into [`InputOutcome`]
//! - [`run_exchange`]: one host/guest/guest/host cycle
//! - [`integrate`]: acknowledgement and reactions to a listener interjection
//! - [`SessionController`]: introduction, exchange loop, closing

mod error;
mod exchange;
mod formatter;
mod injection;
mod input;
mod session;
mod stage;
pub mod testing;

pub use error::ConversationError;
pub use exchange::{ExchangeResult, exchange_budget, run_exchange};
pub use formatter::{Cast, ConsoleEvent, Formatter};
pub use injection::{IntegrationResult, integrate};
pub use input::{
    EXIT_WORDS, InputGate, InputOutcome, InputSource, PromptKind, QuickPauseMode, StdinSource,
    classify,
};
pub use session::{EndReason, SessionController};
pub use stage::{SessionSettings, Stage};
