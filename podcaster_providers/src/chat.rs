use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use podcaster_core::{ChatMessage, LLMProvider, LLMResponse, Usage};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::retry::{RetryPolicy, retry_with_backoff};

pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
pub const DEFAULT_MODEL: &str = "glm-4-flash";

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    retry: RetryPolicy,
}

impl ChatCompletionsProvider {
    /// `timeout` bounds each HTTP request, connect to last body byte.
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating ChatCompletionsProvider");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    #[must_use]
    pub const fn with_sampling(mut self, temperature: f32, max_tokens: usize) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request_body(&self, messages: &[ChatMessage], model: &str) -> Value {
        let mut request = json!({
            "model": model,
            "messages": messages,
        });
        if let Some(temperature) = self.temperature {
            request["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request["max_tokens"] = json!(max_tokens);
        }
        request
    }

    async fn try_send(&self, request: &Value) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        parse_completion(&response)
    }
}

fn token_count(usage: &serde_json::Map<String, Value>, key: &str) -> u32 {
    usage
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Pull the first choice and the token usage out of a completion response.
pub fn parse_completion(response: &Value) -> anyhow::Result<LLMResponse> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
        .trim()
        .to_string();

    if content.is_empty() {
        anyhow::bail!("Model returned an empty message");
    }

    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: token_count(u, "prompt_tokens"),
        completion_tokens: token_count(u, "completion_tokens"),
        total_tokens: token_count(u, "total_tokens"),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for ChatCompletionsProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = self.request_body(messages, model);
        debug!("Sending chat request: model={model}, messages={}", messages.len());

        let response = retry_with_backoff(|| self.try_send(&request), &self.retry).await?;

        if let Some(usage) = &response.usage {
            debug!("Chat response used {} tokens", usage.total_tokens);
        }
        Ok(response)
    }

    fn get_default_model(&self) -> &str {
        &self.default_model
    }
}
