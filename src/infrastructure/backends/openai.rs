#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;
use crate::domain::models::PromptMessage;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Model {
    id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ModelListResponse {
    data: Vec<Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<PromptMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionChoiceResponse {
    message: CompletionMessageResponse,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoiceResponse>,
}

/// Client for any OpenAI compatible chat completions API. Groq serves the
/// same API under its own base URL, so both backends share this client.
pub struct OpenAI {
    name: BackendName,
    url: String,
    token: String,
}

impl OpenAI {
    pub fn groq() -> OpenAI {
        return OpenAI {
            name: BackendName::Groq,
            url: Config::get(ConfigKey::GroqURL),
            token: Config::get(ConfigKey::GroqToken),
        };
    }

    pub fn openai() -> OpenAI {
        return OpenAI {
            name: BackendName::OpenAI,
            url: Config::get(ConfigKey::OpenaiURL),
            token: Config::get(ConfigKey::OpenaiToken),
        };
    }

    pub fn with_token(mut self, token: &str) -> OpenAI {
        self.token = token.trim().to_string();
        return self;
    }
}

#[async_trait]
impl Backend for OpenAI {
    fn name(&self) -> BackendName {
        return self.name;
    }

    fn has_credential(&self) -> bool {
        return !self.token.trim().is_empty();
    }

    #[allow(clippy::implicit_return)]
    async fn list_models(&self) -> Result<Vec<String>> {
        let res = reqwest::Client::new()
            .get(format!("{url}/v1/models", url = self.url))
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            tracing::error!(status = status, backend = %self.name, "Failed to list models");
            bail!(format!("Failed to list models from {} ({status})", self.name));
        }

        let body = res.json::<ModelListResponse>().await?;
        let mut models: Vec<String> = body
            .data
            .iter()
            .map(|model| {
                return model.id.to_string();
            })
            .collect();

        models.sort();

        return Ok(models);
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String> {
        if !self.has_credential() {
            bail!(format!("{} API token is not defined", self.name));
        }

        let req = CompletionRequest {
            model: prompt.model,
            messages: prompt.messages,
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
            stream: false,
        };

        tracing::debug!(
            backend = %self.name,
            model = req.model,
            max_tokens = req.max_tokens,
            temperature = req.temperature,
            "Completion request"
        );

        let res = reqwest::Client::new()
            .post(format!("{url}/v1/chat/completions", url = self.url))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::error!(
                status = status,
                body = body,
                backend = %self.name,
                "Failed to make completion request"
            );
            bail!(format!(
                "Failed to make completion request to {} ({status})",
                self.name
            ));
        }

        let completion = res.json::<CompletionResponse>().await?;
        tracing::debug!(body = ?completion, "Completion response");

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| return choice.message.content)
            .unwrap_or_default();

        return Ok(text);
    }
}
