#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumString;
use strum::EnumVariantNames;

/// Upper bound on `max_tokens` for any single request.
pub const MAX_TOKENS_CEILING: u32 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendName {
    Groq,
    OpenAI,
}

impl BackendName {
    pub fn parse(text: String) -> Option<BackendName> {
        return text.parse::<BackendName>().ok();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: &str) -> PromptMessage {
        return PromptMessage {
            role: PromptRole::System,
            content: content.to_string(),
        };
    }

    pub fn user(content: &str) -> PromptMessage {
        return PromptMessage {
            role: PromptRole::User,
            content: content.to_string(),
        };
    }
}

/// A single non-streaming completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendPrompt {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl BackendPrompt {
    /// Two tokens per requested word, capped at `MAX_TOKENS_CEILING`.
    pub fn token_budget(word_count: usize) -> u32 {
        let budget = word_count.saturating_mul(2);
        return budget.min(MAX_TOKENS_CEILING as usize) as u32;
    }
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;

#[async_trait]
pub trait Backend {
    fn name(&self) -> BackendName;

    /// False when no API token is configured. Callers must not request
    /// completions in that case.
    fn has_credential(&self) -> bool;

    /// Called by `/modellist` and `/model` to list every model the backend
    /// can serve.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Sends one prompt and returns the full generated text. The text may be
    /// empty if the service returned nothing; callers decide what that means.
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String>;
}
