use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Backend;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;

/// In-memory backend for tests. Replays queued replies in order and records
/// every prompt it was sent.
#[derive(Clone, Default)]
pub struct Scripted {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<BackendPrompt>>>,
    models: Vec<String>,
    missing_credential: bool,
}

impl Scripted {
    pub fn new() -> Scripted {
        return Scripted::default();
    }

    pub fn without_credential() -> Scripted {
        return Scripted {
            missing_credential: true,
            ..Scripted::default()
        };
    }

    pub fn with_models(models: Vec<&str>) -> Scripted {
        return Scripted {
            models: models.iter().map(|e| return e.to_string()).collect(),
            ..Scripted::default()
        };
    }

    pub fn reply(self, text: &str) -> Scripted {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Ok(text.to_string()));
        }
        return self;
    }

    pub fn fail(self, reason: &str) -> Scripted {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Err(reason.to_string()));
        }
        return self;
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<BackendPrompt> {
        return self
            .prompts
            .lock()
            .map(|prompts| return prompts.clone())
            .unwrap_or_default();
    }
}

#[async_trait]
impl Backend for Scripted {
    fn name(&self) -> BackendName {
        return BackendName::Groq;
    }

    fn has_credential(&self) -> bool {
        return !self.missing_credential;
    }

    #[allow(clippy::implicit_return)]
    async fn list_models(&self) -> Result<Vec<String>> {
        if self.models.is_empty() {
            bail!("model listing is unavailable");
        }
        return Ok(self.models.clone());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt);
        }

        let next = match self.replies.lock() {
            Ok(mut replies) => replies.pop_front(),
            Err(_) => None,
        };

        return match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => bail!(reason),
            None => bail!("no scripted reply left"),
        };
    }
}
