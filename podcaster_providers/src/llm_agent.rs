//! Speaker agent backed by a chat model.
//!
//! Each request becomes a two-message prompt: a system message describing
//! the persona, and a user message holding the recent transcript plus a
//! directive for the line wanted next.

use async_trait::async_trait;
use podcaster_config::{Persona, PersonaSet};
use podcaster_core::{ChatMessage, Cue, LLMProvider, ResponseRequest, Speaker, SpeakerAgent};
use tracing::debug;

pub struct LlmSpeakerAgent<P> {
    provider: P,
    personas: PersonaSet,
    model: String,
}

impl<P: LLMProvider> LlmSpeakerAgent<P> {
    pub fn new(provider: P, personas: PersonaSet) -> Self {
        let model = provider.get_default_model().to_string();
        Self {
            provider,
            personas,
            model,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn system_prompt(&self, persona: &Persona, speaker: Speaker, topic: &str) -> String {
        let role = if speaker == Speaker::Host {
            format!(
                "You host a live podcast about \"{topic}\" with guests {}.",
                self.personas.guest_names().join(" and ")
            )
        } else {
            format!(
                "You are a guest on a live podcast about \"{topic}\", hosted by {}.",
                self.personas.host.name
            )
        };

        let mut prompt = persona.system_instruction.clone();
        if prompt.is_empty() {
            prompt = format!("You are {}, {}.", persona.name, persona.title);
        }
        prompt.push_str(&format!("\n\n{role}"));
        if !persona.speaking_style.is_empty() {
            prompt.push_str(&format!("\nSpeaking style: {}", persona.speaking_style));
        }
        if !persona.expertise_area.is_empty() {
            prompt.push_str(&format!("\nExpertise: {}", persona.expertise_area.join(", ")));
        }
        prompt.push_str(
            "\nReply with only your spoken words, two to four sentences, no stage directions.",
        );
        prompt
    }

    fn transcript(&self, request: &ResponseRequest<'_>) -> String {
        if request.recent_context.is_empty() {
            return "The show is just starting.".to_string();
        }
        let mut transcript = String::from("Recent conversation:\n");
        for message in request.recent_context {
            transcript.push_str(&format!(
                "{}: {}\n",
                self.personas.display_name(message.speaker),
                message.text
            ));
        }
        transcript
    }

    fn directive(request: &ResponseRequest<'_>) -> String {
        let said = request.user_text.unwrap_or_default();
        match request.cue {
            Cue::Introduction => {
                "Welcome the listeners, introduce the topic and both guests.".to_string()
            }
            Cue::Question => "Ask the guests one clear, open question that moves the discussion \
                              forward."
                .to_string(),
            Cue::Answer => "Answer the host's latest question from your own perspective.".to_string(),
            Cue::FollowUp => {
                "Briefly tie together what the guests just said and set up the next question."
                    .to_string()
            }
            Cue::Acknowledgement => format!(
                "A listener just said: \"{said}\". Acknowledge it warmly and hand it to the guests."
            ),
            Cue::Reaction => format!("A listener just said: \"{said}\". React to it directly."),
            Cue::Closing => "Close the episode: thank the guests and the listener.".to_string(),
            Cue::Interjection => "Respond to the listener.".to_string(),
        }
    }
}

#[async_trait]
impl<P: LLMProvider> SpeakerAgent for LlmSpeakerAgent<P> {
    async fn generate_response(&self, request: ResponseRequest<'_>) -> anyhow::Result<String> {
        let persona = self
            .personas
            .persona(request.speaker)
            .ok_or_else(|| anyhow::anyhow!("no persona speaks for {}", request.speaker))?;

        let messages = [
            ChatMessage::system(self.system_prompt(persona, request.speaker, request.topic)),
            ChatMessage::user(format!(
                "{}\n{}",
                self.transcript(&request),
                Self::directive(&request)
            )),
        ];

        debug!(
            "Generating {:?} for {} at turn {}",
            request.cue, persona.name, request.turn
        );
        let response = self.provider.chat(&messages, &self.model).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use podcaster_config::PersonaLibrary;
    use podcaster_core::{LLMResponse, Message};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CapturingProvider {
        seen: Arc<Mutex<Vec<(Vec<ChatMessage>, String)>>>,
    }

    #[async_trait]
    impl LLMProvider for CapturingProvider {
        async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((messages.to_vec(), model.to_string()));
            Ok(LLMResponse {
                content: "A generated line.".to_string(),
                usage: None,
            })
        }

        fn get_default_model(&self) -> &str {
            "stub-model"
        }
    }

    fn technology() -> PersonaSet {
        PersonaLibrary::builtin()
            .unwrap()
            .get("technology")
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn test_prompt_carries_persona_context_and_listener_text() {
        let provider = CapturingProvider::default();
        let seen = Arc::clone(&provider.seen);
        let agent = LlmSpeakerAgent::new(provider, technology());

        let context = [Message {
            speaker: Speaker::User,
            cue: Cue::Interjection,
            text: "What about energy use?".to_string(),
            turn_number: 6,
            timestamp: Utc::now(),
        }];
        let line = agent
            .generate_response(ResponseRequest {
                speaker: Speaker::GuestA,
                cue: Cue::Reaction,
                topic: "AI in healthcare",
                turn: 8,
                recent_context: &context,
                user_text: Some("What about energy use?"),
            })
            .await
            .unwrap();

        assert_eq!(line, "A generated line.");
        let seen = seen.lock().unwrap();
        let (messages, model) = &seen[0];
        assert_eq!(model, "stub-model");
        assert!(messages[0].content.starts_with("You are Dr. Maya Chen"));
        assert!(messages[0].content.contains("AI in healthcare"));
        assert!(messages[0].content.contains("Alex Rivera"));
        assert!(messages[0].content.contains("\nSpeaking style: Measured and evidence driven"));
        assert!(messages[0].content.contains("\nExpertise: machine learning, AI ethics"));
        assert!(messages[1].content.contains("You: What about energy use?\n"));
        assert!(messages[1].content.contains("React to it directly"));
    }

    #[tokio::test]
    async fn test_model_override_and_empty_context() {
        let provider = CapturingProvider::default();
        let seen = Arc::clone(&provider.seen);
        let agent = LlmSpeakerAgent::new(provider, technology()).with_model("big-model".to_string());

        agent
            .generate_response(ResponseRequest {
                speaker: Speaker::Host,
                cue: Cue::Introduction,
                topic: "space travel",
                turn: 1,
                recent_context: &[],
                user_text: None,
            })
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].1, "big-model");
        assert!(seen[0].0[1].content.starts_with("The show is just starting."));
        assert!(seen[0].0[0].content.contains("Dr. Maya Chen and Jordan Blake"));
    }

    #[tokio::test]
    async fn test_listener_has_no_persona() {
        let agent = LlmSpeakerAgent::new(CapturingProvider::default(), technology());
        let result = agent
            .generate_response(ResponseRequest {
                speaker: Speaker::User,
                cue: Cue::Interjection,
                topic: "space travel",
                turn: 3,
                recent_context: &[],
                user_text: None,
            })
            .await;
        assert!(result.is_err());
    }
}
