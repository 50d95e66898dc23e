#![deny(
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

mod chat;
mod llm_agent;
mod retry;
mod simulated;

pub use chat::{ChatCompletionsProvider, DEFAULT_BASE_URL, DEFAULT_MODEL, parse_completion};
pub use llm_agent::LlmSpeakerAgent;
pub use retry::{RetryPolicy, retry_with_backoff};
pub use simulated::SimulatedAgent;
