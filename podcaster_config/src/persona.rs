//! Persona sets: one host and the guests who join them.
//!
//! A built-in `technology` set is always present; additional sets are read
//! from `*.json` files in a persona directory. Sets that fail validation are
//! skipped with an error log so one broken file never hides the others.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use podcaster_core::Speaker;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub speaking_style: String,
    #[serde(default)]
    pub expertise_area: Vec<String>,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub system_instruction: String,
}

impl Persona {
    #[must_use]
    pub fn has_trait(&self, name: &str) -> bool {
        self.personality_traits
            .iter()
            .any(|t| t.eq_ignore_ascii_case(name))
    }

    fn check(&self, label: &str, errors: &mut Vec<String>) {
        for (field, value) in [
            ("id", &self.id),
            ("name", &self.name),
            ("title", &self.title),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{label}: missing required field '{field}'"));
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSet {
    pub set_id: String,
    pub set_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub domains: Vec<String>,
    pub host: Persona,
    pub guests: Vec<Persona>,
}

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Persona set '{set_id}' is invalid: {}", errors.join("; "))]
    Invalid { set_id: String, errors: Vec<String> },

    #[error("Persona set '{set_id}' not found. Available sets: {}", available.join(", "))]
    NotFound {
        set_id: String,
        available: Vec<String>,
    },

    #[error("Failed to read persona file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse persona file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PersonaSet {
    /// Check required fields, guest count and id uniqueness.
    pub fn validate(&self) -> Result<(), PersonaError> {
        let mut errors = Vec::new();

        if self.set_id.trim().is_empty() {
            errors.push("missing required field 'set_id'".to_string());
        }
        if self.set_name.trim().is_empty() {
            errors.push("missing required field 'set_name'".to_string());
        }

        self.host.check("host", &mut errors);
        if self.guests.len() < 2 {
            errors.push(format!(
                "two guest personas are required, found {}",
                self.guests.len()
            ));
        }
        for (i, guest) in self.guests.iter().enumerate() {
            guest.check(&format!("guest {}", i + 1), &mut errors);
        }

        let mut seen = HashSet::new();
        let all_unique = std::iter::once(&self.host)
            .chain(&self.guests)
            .all(|p| seen.insert(p.id.as_str()));
        if !all_unique {
            errors.push("duplicate persona ids".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PersonaError::Invalid {
                set_id: self.set_id.clone(),
                errors,
            })
        }
    }

    /// Persona speaking for `speaker`; `None` for the human participant.
    #[must_use]
    pub fn persona(&self, speaker: Speaker) -> Option<&Persona> {
        match speaker {
            Speaker::Host => Some(&self.host),
            Speaker::GuestA => self.guests.first(),
            Speaker::GuestB => self.guests.get(1),
            Speaker::User => None,
        }
    }

    #[must_use]
    pub fn display_name(&self, speaker: Speaker) -> &str {
        self.persona(speaker).map_or("You", |p| p.name.as_str())
    }

    /// Names of the two guests taking part, in speaking order.
    #[must_use]
    pub fn guest_names(&self) -> Vec<&str> {
        self.guests.iter().take(2).map(|g| g.name.as_str()).collect()
    }
}

const BUILTIN_TECHNOLOGY: &str = r#"{
  "set_id": "technology",
  "set_name": "Technology & AI",
  "description": "A researcher and a founder debate where technology is heading.",
  "domains": ["technology", "ai", "software"],
  "host": {
    "id": "alex_rivera",
    "name": "Alex Rivera",
    "title": "Podcast Host & Tech Journalist",
    "personality_traits": ["curious", "engaging", "balanced"],
    "speaking_style": "Warm and conversational, asks open questions and ties threads together.",
    "expertise_area": ["technology journalism", "interviewing"],
    "background": "Fifteen years covering the technology industry.",
    "system_instruction": "You are Alex Rivera, the host of AI-Podcast. Keep the discussion moving, ask one clear question at a time, and bring in the listener whenever they speak up."
  },
  "guests": [
    {
      "id": "maya_chen",
      "name": "Dr. Maya Chen",
      "title": "AI Research Scientist",
      "personality_traits": ["analytical", "thoughtful", "precise"],
      "speaking_style": "Measured and evidence driven, cites studies and frames trade-offs.",
      "expertise_area": ["machine learning", "AI ethics"],
      "background": "Leads an academic lab studying the societal impact of machine learning.",
      "system_instruction": "You are Dr. Maya Chen, an AI researcher. Ground your answers in research and evidence, and be explicit about uncertainty."
    },
    {
      "id": "jordan_blake",
      "name": "Jordan Blake",
      "title": "Tech Entrepreneur & Founder",
      "personality_traits": ["practical", "energetic", "direct"],
      "speaking_style": "Fast paced, anecdotal, focused on what works in production.",
      "expertise_area": ["startups", "product development"],
      "background": "Founded and scaled several technology companies.",
      "system_instruction": "You are Jordan Blake, a serial tech entrepreneur. Speak from hands-on experience and focus on real-world results."
    }
  ]
}"#;

/// All persona sets available to a session, keyed by set id.
#[derive(Debug, Clone)]
pub struct PersonaLibrary {
    sets: BTreeMap<String, PersonaSet>,
}

impl PersonaLibrary {
    /// Library holding only the built-in sets.
    pub fn builtin() -> Result<Self, PersonaError> {
        let technology: PersonaSet = serde_json::from_str(BUILTIN_TECHNOLOGY)?;
        technology.validate()?;

        let mut sets = BTreeMap::new();
        sets.insert(technology.set_id.clone(), technology);
        Ok(Self { sets })
    }

    /// Add every valid `*.json` persona set found in `dir`.
    ///
    /// Returns the number of sets added. A missing directory adds nothing.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, PersonaError> {
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match Self::read_set(&path) {
                Ok(set) => {
                    info!("Loaded persona set: {}", set.set_id);
                    self.sets.insert(set.set_id.clone(), set);
                    loaded += 1;
                }
                Err(e) => error!("Skipping persona file {}: {e}", path.display()),
            }
        }

        Ok(loaded)
    }

    fn read_set(path: &Path) -> Result<PersonaSet, PersonaError> {
        let content = std::fs::read_to_string(path)?;
        let set: PersonaSet = serde_json::from_str(&content)?;
        set.validate()?;
        Ok(set)
    }

    pub fn get(&self, set_id: &str) -> Result<&PersonaSet, PersonaError> {
        self.sets.get(set_id).ok_or_else(|| PersonaError::NotFound {
            set_id: set_id.to_string(),
            available: self.sets.keys().cloned().collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaSet> {
        self.sets.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
