//! The speaker-agent contract.
//!
//! The orchestrator never inspects how a line is produced; it hands the agent
//! a read-only snapshot of recent history and gets back text.

use async_trait::async_trait;
use std::sync::Arc;

use crate::message::{Cue, Message, Speaker};

/// Everything an agent may look at when producing one line.
#[derive(Debug, Clone, Copy)]
pub struct ResponseRequest<'a> {
    pub speaker: Speaker,
    pub cue: Cue,
    pub topic: &'a str,
    /// Turn number the response will occupy once appended.
    pub turn: usize,
    pub recent_context: &'a [Message],
    pub user_text: Option<&'a str>,
}

#[async_trait]
pub trait SpeakerAgent: Send + Sync {
    async fn generate_response(&self, request: ResponseRequest<'_>) -> anyhow::Result<String>;
}

#[async_trait]
impl<T> SpeakerAgent for Arc<T>
where
    T: SpeakerAgent + ?Sized,
{
    async fn generate_response(&self, request: ResponseRequest<'_>) -> anyhow::Result<String> {
        (**self).generate_response(request).await
    }
}
