use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use podcaster_core::DEFAULT_MAX_TURNS;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub conversation: ConversationSettings,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Extra directory of persona-set JSON files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personas_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversationSettings {
    #[serde(default = "ConversationSettings::default_max_turns")]
    pub max_turns: usize,
    #[serde(default = "ConversationSettings::default_exchanges_per_prompt")]
    pub exchanges_per_prompt: usize,
    /// Quick-pause window; 0 means a blocking read with no timeout.
    #[serde(default = "ConversationSettings::default_quick_pause_ms")]
    pub quick_pause_ms: u64,
    #[serde(default = "ConversationSettings::default_context_window")]
    pub context_window: usize,
    #[serde(default = "ConversationSettings::default_pacing_ms")]
    pub pacing_ms: u64,
    /// Longest wait for one speaker's line before a notice stands in for it.
    #[serde(default = "ConversationSettings::default_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max_turns: Self::default_max_turns(),
            exchanges_per_prompt: Self::default_exchanges_per_prompt(),
            quick_pause_ms: Self::default_quick_pause_ms(),
            context_window: Self::default_context_window(),
            pacing_ms: Self::default_pacing_ms(),
            response_timeout_secs: Self::default_response_timeout_secs(),
        }
    }
}

impl ConversationSettings {
    const fn default_max_turns() -> usize {
        DEFAULT_MAX_TURNS
    }

    const fn default_exchanges_per_prompt() -> usize {
        3
    }

    const fn default_quick_pause_ms() -> u64 {
        2000
    }

    const fn default_context_window() -> usize {
        5
    }

    const fn default_pacing_ms() -> u64 {
        500
    }

    const fn default_response_timeout_secs() -> u64 {
        60
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    #[default]
    Simulated,
    Llm,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentsConfig {
    #[serde(default)]
    pub mode: AgentMode,
    #[serde(default = "AgentsConfig::default_model")]
    pub model: String,
    #[serde(default = "AgentsConfig::default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "AgentsConfig::default_temperature")]
    pub temperature: f32,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            mode: AgentMode::default(),
            model: Self::default_model(),
            max_tokens: Self::default_max_tokens(),
            temperature: Self::default_temperature(),
        }
    }
}

impl AgentsConfig {
    fn default_model() -> String {
        "glm-4-flash".to_string()
    }

    const fn default_max_tokens() -> usize {
        512
    }

    const fn default_temperature() -> f32 {
        0.8
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub chat: ChatProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "ChatProviderConfig::default_base_url")]
    pub base_url: String,
    /// Per-request HTTP timeout.
    #[serde(default = "ChatProviderConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChatProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl ChatProviderConfig {
    fn default_base_url() -> String {
        "https://open.bigmodel.cn/api/paas/v4".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "conversation": {
    "max_turns": 50,
    "exchanges_per_prompt": 3,
    "quick_pause_ms": 2000,
    "context_window": 5,
    "pacing_ms": 500,
    "response_timeout_secs": 60
  },
  "agents": {
    "mode": "simulated",
    "model": "glm-4-flash",
    "max_tokens": 512,
    "temperature": 0.8
  },
  "providers": {
    "chat": {
      "api_key": "your-api-key-here",
      "base_url": "https://open.bigmodel.cn/api/paas/v4",
      "timeout_secs": 30
    }
  }
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("podcaster"))
    }

    /// Load `~/podcaster/config.json`, falling back to defaults when absent.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            tracing::info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;
        std::fs::create_dir_all(config_dir.join("personas"))?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Set agents.mode to \"llm\" and add your API key to use a model");
        println!("   2. Drop extra persona sets into {}", config_dir.join("personas").display());
        println!("   3. Run 'podcaster run --topic \"...\"' to start a session");
        println!();
        Ok(())
    }
}
