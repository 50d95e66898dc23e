//! Offline speaker agent with canned, persona-flavoured lines.
//!
//! Lines rotate with the turn number, so a session is fully reproducible.

use async_trait::async_trait;
use podcaster_config::{Persona, PersonaSet};
use podcaster_core::{Cue, ResponseRequest, Speaker, SpeakerAgent};

const QUESTIONS: [&str; 5] = [
    "That's a fascinating perspective. How do you see this playing out in practice?",
    "Building on that point, what challenges might we encounter?",
    "What opportunities does this present for innovation?",
    "How should we balance the different perspectives on this?",
    "What does the future look like in this space?",
];

const FOLLOW_UPS: [&str; 4] = [
    "Excellent points from both of you. Let's explore this further.",
    "That's fascinating. There's clearly a lot to unpack here.",
    "I love how you've framed that. Let's dig deeper.",
    "These are important perspectives. Let's continue.",
];

const ACK_QUESTION: [&str; 3] = [
    "Great question from our listener! Let's hear what our guests think about this.",
    "That's an excellent question. This is exactly what we need to explore.",
    "I'm glad you asked that. Let's get our guests' perspectives on this.",
];

const ACK_STATEMENT: [&str; 3] = [
    "Thank you for that insight! Let's hear what our guests think about this perspective.",
    "That's a great point. Let's explore this further with our guests.",
    "Interesting observation! Let's see how this connects to what we've been discussing.",
];

const ANALYTICAL: [&str; 4] = [
    "From a research perspective, the data shows several interesting trends here.",
    "Studies indicate that this is a complex issue with multiple variables to consider.",
    "The theoretical framework suggests we need to examine this more closely.",
    "Based on the evidence, I think we're seeing a fundamental shift in how this works.",
];

const PRACTICAL: [&str; 4] = [
    "In my experience, what actually works is focusing on measurable outcomes.",
    "We implemented something similar at my company, and the results were eye-opening.",
    "The practical reality is that execution matters more than perfect planning.",
    "Here's what I've learned from building this in the real world.",
];

const GENERIC: [&str; 4] = [
    "That's an important point to consider.",
    "I think there are several angles we should explore here.",
    "This connects to broader trends we're seeing.",
    "It's worth thinking about the implications of this.",
];

const REACTION_LEADS: [&str; 3] = [
    "Our listener raises something worth unpacking.",
    "I'm glad that came up.",
    "That's a sharp observation from the audience.",
];

fn rotate<'a>(lines: &[&'a str], index: usize) -> &'a str {
    lines[index % lines.len()]
}

/// Guest register derived from persona traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuestStyle {
    Analytical,
    Practical,
    Generic,
}

impl GuestStyle {
    fn of(persona: Option<&Persona>) -> Self {
        match persona {
            Some(p) if p.has_trait("analytical") => Self::Analytical,
            Some(p) if p.has_trait("practical") => Self::Practical,
            _ => Self::Generic,
        }
    }

    const fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Analytical => &ANALYTICAL,
            Self::Practical => &PRACTICAL,
            Self::Generic => &GENERIC,
        }
    }
}

pub struct SimulatedAgent {
    personas: PersonaSet,
}

impl SimulatedAgent {
    #[must_use]
    pub const fn new(personas: PersonaSet) -> Self {
        Self { personas }
    }

    fn guests(&self) -> String {
        self.personas.guest_names().join(" and ")
    }

    fn host_line(&self, cue: Cue, request: &ResponseRequest<'_>) -> String {
        let turn = request.turn;
        let topic = request.topic;
        match cue {
            Cue::Introduction => format!(
                "Welcome to AI-Podcast! I'm your host, {}, and today we're diving into a \
                 fascinating topic: {topic}. I'm joined by {}. Let's explore this together!",
                self.personas.host.name,
                self.guests()
            ),
            Cue::Question if turn <= 2 => format!(
                "Let's dig deeper into {topic}. What are the key considerations we should be \
                 thinking about?"
            ),
            Cue::Acknowledgement => {
                let asked = request.user_text.is_some_and(|t| t.contains('?'));
                let lines = if asked { &ACK_QUESTION } else { &ACK_STATEMENT };
                rotate(lines, turn).to_string()
            }
            Cue::FollowUp => rotate(&FOLLOW_UPS, turn).to_string(),
            Cue::Closing => format!(
                "Thank you all for joining this fascinating discussion about {topic}! Big thanks \
                 to {} for sharing their insights. And to you, our listener, for being part of \
                 this conversation. Until next time, keep exploring and stay curious!",
                self.guests()
            ),
            _ => rotate(&QUESTIONS, turn / 4).to_string(),
        }
    }

    fn guest_line(&self, speaker: Speaker, cue: Cue, turn: usize) -> String {
        let style = GuestStyle::of(self.personas.persona(speaker));
        let line = rotate(style.lines(), turn);
        if cue == Cue::Reaction {
            format!("{} {line}", rotate(&REACTION_LEADS, turn))
        } else {
            line.to_string()
        }
    }
}

#[async_trait]
impl SpeakerAgent for SimulatedAgent {
    async fn generate_response(&self, request: ResponseRequest<'_>) -> anyhow::Result<String> {
        match request.speaker {
            Speaker::Host => Ok(self.host_line(request.cue, &request)),
            Speaker::GuestA | Speaker::GuestB => {
                Ok(self.guest_line(request.speaker, request.cue, request.turn))
            }
            Speaker::User => anyhow::bail!("the listener's lines are never generated"),
        }
    }
}
