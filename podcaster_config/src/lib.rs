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

//! Application configuration and persona-set loading.

mod persona;
mod schema;

pub use persona::{Persona, PersonaError, PersonaLibrary, PersonaSet};
pub use schema::{
    AgentMode, AgentsConfig, ChatProviderConfig, Config, ConversationSettings, ProvidersConfig,
};
