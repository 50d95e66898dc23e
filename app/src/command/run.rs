//! Live podcast session on the terminal.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use podcaster_config::{AgentMode, Config, PersonaLibrary, PersonaSet};
use podcaster_conversation::{
    Cast, InputGate, QuickPauseMode, SessionController, SessionSettings, StdinSource,
};
use podcaster_core::{Speaker, SpeakerAgent, SummaryRecord};
use podcaster_providers::{ChatCompletionsProvider, LlmSpeakerAgent, SimulatedAgent};
use tracing::info;

use super::load_library;

/// Input parameters for the Run command strategy.
#[derive(Debug, Clone)]
pub struct RunInput {
    /// Persona set id; asked for when several sets are available
    pub persona_set: Option<String>,
    /// Discussion topic; asked for when omitted
    pub topic: Option<String>,
    /// Force canned responses regardless of `agents.mode`
    pub simulated: bool,
}

/// Strategy for running one podcast session.
///
/// Picks the persona set and topic, builds the speaker agent for the
/// configured mode and hands the terminal to the session controller until
/// the listener leaves, the turn limit is reached or Ctrl+C is pressed.
#[derive(Debug, Clone, Copy)]
pub struct RunStrategy;

impl super::CommandStrategy for RunStrategy {
    type Input = RunInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let library = load_library(&config)?;

        let personas = choose_persona_set(&library, input.persona_set.as_deref())?.clone();
        info!("Using persona set: {}", personas.set_id);

        let topic = match input.topic {
            Some(topic) => topic,
            None => prompt_line("What topic would you like to discuss today? ")?,
        };
        let topic = topic.trim();
        if topic.is_empty() {
            anyhow::bail!("Please provide a topic for discussion.");
        }

        let agent = build_agent(&config, &personas, input.simulated)?;
        let cast = Cast::new(
            personas.display_name(Speaker::Host),
            personas.display_name(Speaker::GuestA),
            personas.display_name(Speaker::GuestB),
        );

        let conversation = &config.conversation;
        let settings = SessionSettings::default()
            .with_max_turns(conversation.max_turns)
            .with_exchanges_per_prompt(conversation.exchanges_per_prompt.max(1))
            .with_context_window(conversation.context_window)
            .with_pacing(Duration::from_millis(conversation.pacing_ms))
            .with_response_timeout(Duration::from_secs(conversation.response_timeout_secs));
        let gate = InputGate::new(
            StdinSource::spawn()?,
            QuickPauseMode::from_millis(conversation.quick_pause_ms),
        );

        let mut controller =
            SessionController::new(topic, cast, agent, gate, std::io::stdout(), settings);
        let completed = controller.start_conversation().await;
        if !completed {
            info!("Session ended early");
        }

        if let Some(summary) = controller.get_summary() {
            print_summary(&summary, &personas);
        }

        Ok(())
    }
}

fn build_agent(
    config: &Config,
    personas: &PersonaSet,
    simulated: bool,
) -> anyhow::Result<Arc<dyn SpeakerAgent>> {
    let mode = if simulated {
        AgentMode::Simulated
    } else {
        config.agents.mode
    };

    match mode {
        AgentMode::Simulated => {
            info!("Using simulated speaker agents");
            Ok(Arc::new(SimulatedAgent::new(personas.clone())))
        }
        AgentMode::Llm => {
            let chat = &config.providers.chat;
            if chat.api_key.is_empty() || chat.api_key == "your-api-key-here" {
                anyhow::bail!(
                    "agents.mode is \"llm\" but providers.chat.api_key is not set. \
                     Edit ~/podcaster/config.json or pass --simulated."
                );
            }

            info!("Using model {} at {}", config.agents.model, chat.base_url);
            let provider = ChatCompletionsProvider::new(
                chat.api_key.clone(),
                Duration::from_secs(chat.timeout_secs),
            )?
            .with_base_url(chat.base_url.clone())
            .with_sampling(config.agents.temperature, config.agents.max_tokens);
            Ok(Arc::new(
                LlmSpeakerAgent::new(provider, personas.clone())
                    .with_model(config.agents.model.clone()),
            ))
        }
    }
}

/// Resolve the persona set from the argument, the only available set, or a
/// numbered choice on stdin.
fn choose_persona_set<'a>(
    library: &'a PersonaLibrary,
    requested: Option<&str>,
) -> anyhow::Result<&'a PersonaSet> {
    if let Some(set_id) = requested {
        return Ok(library.get(set_id)?);
    }

    let sets: Vec<&PersonaSet> = library.iter().collect();
    if let [only] = sets.as_slice() {
        return Ok(*only);
    }

    println!("\nAvailable persona sets:");
    for (i, set) in sets.iter().enumerate() {
        println!("  {}. {} ({}): {}", i + 1, set.set_name, set.set_id, set.description);
    }
    let choice = prompt_line("\nChoose a persona set [1]: ")?;
    let choice = choice.trim();

    if choice.is_empty() {
        return sets
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("No persona sets available"));
    }
    if let Ok(n) = choice.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| sets.get(i))
            .copied()
            .ok_or_else(|| anyhow::anyhow!("No persona set numbered {n}"));
    }
    Ok(library.get(choice)?)
}

fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}

fn print_summary(summary: &SummaryRecord, personas: &PersonaSet) {
    println!("📊 Session summary");
    println!("   Topic: {}", summary.topic);
    println!("   Turns: {}", summary.total_turns);
    println!("   Exchanges: {}", summary.total_exchanges);
    for speaker in [Speaker::Host, Speaker::GuestA, Speaker::GuestB, Speaker::User] {
        println!(
            "   {}: {} message(s)",
            personas.display_name(speaker),
            summary.speaker_counts.get(speaker)
        );
    }
    if summary.interrupted {
        println!("   Ended by interrupt");
    }
    println!();
}
