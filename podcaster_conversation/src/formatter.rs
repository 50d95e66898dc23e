//! Terminal rendering for conversation events.

use podcaster_core::{Message, Speaker};

const SEPARATOR_MAIN: &str = "════════════════════════════════════════════════════════════";
const SEPARATOR_SUB: &str = "────────────────────────────────────────────────────────────";

/// Display names for everyone on the show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    pub host: String,
    pub guest_a: String,
    pub guest_b: String,
}

impl Cast {
    #[must_use]
    pub fn new(host: impl Into<String>, guest_a: impl Into<String>, guest_b: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            guest_a: guest_a.into(),
            guest_b: guest_b.into(),
        }
    }

    #[must_use]
    pub fn name(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Host => &self.host,
            Speaker::GuestA => &self.guest_a,
            Speaker::GuestB => &self.guest_b,
            Speaker::User => "You",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ConsoleEvent<'a> {
    Welcome { topic: &'a str, cast: &'a Cast },
    Message { message: &'a Message, name: &'a str },
    QuickPause,
    UserPrompt,
    Continuing,
    System(&'a str),
    Goodbye,
    Error(&'a str),
}

/// Stateless formatter; every call is a pure function of the event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter;

impl Formatter {
    #[must_use]
    pub fn render(&self, event: &ConsoleEvent<'_>) -> String {
        match event {
            ConsoleEvent::Welcome { topic, cast } => format!(
                "\n{SEPARATOR_MAIN}\n🎙️  WELCOME TO AI-PODCAST  🎙️\n{SEPARATOR_MAIN}\n\
                 📝 Topic: {topic}\n🎤 Host: {}\n👥 Guests: {} and {}\n{SEPARATOR_MAIN}\n\n\
                 🎬 Let's begin...",
                cast.host, cast.guest_a, cast.guest_b
            ),
            ConsoleEvent::Message { message, name } => {
                let (icon, role) = Self::badge(message.speaker);
                format!(
                    "\n{SEPARATOR_MAIN}\n{icon} {} ({role}):\n{SEPARATOR_SUB}\n{}",
                    name.to_uppercase(),
                    message.text
                )
            }
            ConsoleEvent::QuickPause => {
                "\n💭 [Pause - Press Enter to continue, or type to chime in...]".to_string()
            }
            ConsoleEvent::UserPrompt => format!(
                "\n{SEPARATOR_MAIN}\n💬 YOUR TURN\n{SEPARATOR_SUB}\n\
                 Would you like to join the conversation?\n\
                 \u{20} • Type your comment or question\n\
                 \u{20} • Press Enter to continue listening\n\
                 \u{20} • Type 'stop', 'exit', or 'quit' to end the podcast"
            ),
            ConsoleEvent::Continuing => "   [Continuing...]".to_string(),
            ConsoleEvent::System(text) => format!("\nℹ️  {text}"),
            ConsoleEvent::Goodbye => format!(
                "\n{SEPARATOR_MAIN}\n🎙️  THANK YOU FOR LISTENING  🎙️\n{SEPARATOR_MAIN}\n\n\
                 The podcast has ended. We hope you enjoyed the conversation!\n\n{SEPARATOR_MAIN}"
            ),
            ConsoleEvent::Error(text) => format!("\n❌ ERROR\n{SEPARATOR_SUB}\n{text}"),
        }
    }

    const fn badge(speaker: Speaker) -> (&'static str, &'static str) {
        match speaker {
            Speaker::Host => ("🎙️", "Host"),
            Speaker::GuestA => ("👩‍🔬", "Guest"),
            Speaker::GuestB => ("👔", "Guest"),
            Speaker::User => ("💬", "You"),
        }
    }
}
