use podcaster_config::{Config, Persona};

use super::load_library;

/// Strategy for displaying one persona set in detail.
///
/// Outputs the set description followed by each persona:
/// - Name and title
/// - Personality traits and speaking style
/// - Expertise and background
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = String;

    async fn execute(&self, set_id: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let library = load_library(&config)?;
        let set = library.get(&set_id)?;

        println!("=== {} ({}) ===\n", set.set_name, set.set_id);
        if !set.description.is_empty() {
            println!("{}\n", set.description);
        }

        print_persona("Host", &set.host);
        for (i, guest) in set.guests.iter().enumerate() {
            let role = if i < 2 {
                format!("Guest {}", i + 1)
            } else {
                "Guest (not seated)".to_string()
            };
            print_persona(&role, guest);
        }

        Ok(())
    }
}

fn print_persona(role: &str, persona: &Persona) {
    println!("{role}: {} - {}", persona.name, persona.title);
    if !persona.personality_traits.is_empty() {
        println!("  Traits: {}", persona.personality_traits.join(", "));
    }
    if !persona.speaking_style.is_empty() {
        println!("  Style: {}", truncate(&persona.speaking_style, 80));
    }
    if !persona.expertise_area.is_empty() {
        println!("  Expertise: {}", persona.expertise_area.join(", "));
    }
    if !persona.background.is_empty() {
        println!("  Background: {}", truncate(&persona.background, 80));
    }
    println!();
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
