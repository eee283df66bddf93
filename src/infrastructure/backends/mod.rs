#[cfg(test)]
pub mod scripted;

pub mod openai;

use anyhow::Result;

use crate::domain::models::BackendBox;
use crate::domain::models::BackendName;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(name: BackendName) -> Result<BackendBox> {
        let backend = match name {
            BackendName::Groq => openai::OpenAI::groq(),
            BackendName::OpenAI => openai::OpenAI::openai(),
        };

        return Ok(Box::new(backend));
    }

    /// Same as `get`, but with an API token supplied at runtime instead of
    /// the configured one.
    pub fn get_with_token(name: BackendName, token: &str) -> Result<BackendBox> {
        let backend = match name {
            BackendName::Groq => openai::OpenAI::groq(),
            BackendName::OpenAI => openai::OpenAI::openai(),
        };

        return Ok(Box::new(backend.with_token(token)));
    }
}
