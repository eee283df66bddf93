#[cfg(test)]
#[path = "story_generator_test.rs"]
mod tests;

use std::time::Instant;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::now_rfc3339;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;
use crate::domain::models::PromptMessage;
use crate::domain::models::Story;
use crate::domain::models::StoryError;
use crate::domain::models::StoryMetadata;
use crate::domain::models::StoryRequest;
use crate::domain::models::UNTITLED_STORY;

const STORY_SYSTEM_PROMPT: &str = "You are a creative storyteller. Your task is to write engaging, original stories based on user parameters. Make your stories vivid, emotionally resonant, and memorable.";
const EXPAND_SYSTEM_PROMPT: &str = "You are a creative storyteller. Your task is to expand or modify existing stories based on user requests while maintaining narrative consistency.";

static TITLE_LINE: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"(?i)^\s*#*\s*\**\s*(?:title\s*:)?(.*)$").unwrap());

/// Splits a generated story into its title and body. The title is the first
/// non-blank line with heading, bold and `Title:` markers removed.
pub fn split_title(text: &str) -> (String, String) {
    let mut lines = text.lines().skip_while(|line| return line.trim().is_empty());
    let first_line = lines.next().unwrap_or_default();
    let body = lines.collect::<Vec<&str>>().join("\n").trim().to_string();

    let title = TITLE_LINE
        .captures(first_line)
        .and_then(|captures| return captures.get(1))
        .map(|capture| {
            return capture
                .as_str()
                .trim_matches(|c: char| {
                    return c == '*' || c == '"' || c == '\'' || c.is_whitespace();
                })
                .to_string();
        })
        .unwrap_or_default();

    if title.is_empty() {
        return (UNTITLED_STORY.to_string(), body);
    }

    return (title, body);
}

fn story_prompt(request: &StoryRequest) -> String {
    let mut lines = vec![
        format!(
            "Write a {} story with the following parameters:",
            request.genre.to_lowercase()
        ),
        "".to_string(),
    ];

    match &request.title {
        Some(title) => lines.push(format!("Title: {title}")),
        None => lines.push("Generate a creative and captivating title for this story.".to_string()),
    }
    lines.push(format!("Characters: {}", request.characters));
    lines.push(format!("Setting: {}", request.setting));
    if let Some(theme) = &request.theme {
        lines.push(format!("Theme: {theme}"));
    }

    lines.push("".to_string());
    lines.push(format!(
        "The story should be approximately {} words long.",
        request.word_count
    ));
    lines.push("Include dialogue, descriptive language, and a satisfying plot arc.".to_string());
    lines.push(
        "Format the story with proper paragraphs and a clear beginning, middle, and end."
            .to_string(),
    );

    return lines.join("\n");
}

fn expand_prompt(original: &str, instruction: &str) -> String {
    let instruction = instruction.trim().trim_end_matches('.');
    return format!(
        "Here is an existing story:\n\n{}\n\nPlease {instruction}. Maintain the same style, tone, and characters.\nReturn the full updated story with your changes incorporated seamlessly.",
        original.trim()
    );
}

/// Turns collected story parameters into finished stories using whichever
/// backend is configured.
pub struct StoryGenerator {
    backend: BackendBox,
}

impl StoryGenerator {
    pub fn new(backend: BackendBox) -> StoryGenerator {
        return StoryGenerator { backend };
    }

    pub fn backend_name(&self) -> BackendName {
        return self.backend.name();
    }

    pub fn has_credential(&self) -> bool {
        return self.backend.has_credential();
    }

    pub fn set_backend(&mut self, backend: BackendBox) {
        self.backend = backend;
    }

    pub async fn list_models(&self) -> Result<Vec<String>> {
        return self.backend.list_models().await;
    }

    async fn complete(&self, prompt: BackendPrompt) -> Result<String, StoryError> {
        if !self.backend.has_credential() {
            return Err(StoryError::MissingCredential);
        }

        let text = self
            .backend
            .get_completion(prompt)
            .await
            .map_err(|err| return StoryError::Generation(err.to_string()))?;

        if text.trim().is_empty() {
            return Err(StoryError::Generation(
                "the model returned an empty response".to_string(),
            ));
        }

        return Ok(text);
    }

    pub async fn generate_story(&self, request: &StoryRequest) -> Result<Story, StoryError> {
        let prompt = BackendPrompt {
            model: request.model.to_string(),
            messages: vec![
                PromptMessage::system(STORY_SYSTEM_PROMPT),
                PromptMessage::user(&story_prompt(request)),
            ],
            max_tokens: BackendPrompt::token_budget(request.word_count as usize),
            temperature: request.temperature,
        };

        let start = Instant::now();
        let text = self.complete(prompt).await?;
        let elapsed = start.elapsed().as_secs_f64();

        let (title, content) = match &request.title {
            Some(title) => (title.to_string(), text.trim().to_string()),
            None => split_title(&text),
        };

        tracing::debug!(
            title = title,
            words = content.split_whitespace().count(),
            seconds = elapsed,
            "Story generated"
        );

        return Ok(Story {
            title,
            content,
            metadata: StoryMetadata {
                genre: request.genre.to_string(),
                characters: request.characters.to_string(),
                setting: request.setting.to_string(),
                theme: request.theme.clone(),
                model: request.model.to_string(),
                temperature: request.temperature,
                word_count: request.word_count,
                generation_time_seconds: (elapsed * 100.0).round() / 100.0,
                created_at: now_rfc3339(),
                last_revised_at: None,
                saved_at: None,
            },
        });
    }

    /// Rewrites `original` following `instruction` and returns the complete
    /// new story text.
    pub async fn expand_story(
        &self,
        original: &str,
        instruction: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, StoryError> {
        let prompt = BackendPrompt {
            model: model.to_string(),
            messages: vec![
                PromptMessage::system(EXPAND_SYSTEM_PROMPT),
                PromptMessage::user(&expand_prompt(original, instruction)),
            ],
            max_tokens: BackendPrompt::token_budget(original.split_whitespace().count()),
            temperature,
        };

        let text = self.complete(prompt).await?;
        return Ok(text.trim().to_string());
    }
}
