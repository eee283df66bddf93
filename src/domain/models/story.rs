#[cfg(test)]
#[path = "story_test.rs"]
mod tests;

use std::path;

use serde_derive::Deserialize;
use serde_derive::Serialize;

pub const UNTITLED_STORY: &str = "Untitled Story";

/// Everything the generator needs to write a story. `title` and `theme` are
/// `None` when the user skipped them.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryRequest {
    pub title: Option<String>,
    pub genre: String,
    pub characters: String,
    pub setting: String,
    pub theme: Option<String>,
    pub word_count: u32,
    pub temperature: f32,
    pub model: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryMetadata {
    pub genre: String,
    pub characters: String,
    pub setting: String,
    pub theme: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub word_count: u32,
    pub generation_time_seconds: f64,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_revised_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub content: String,
    pub metadata: StoryMetadata,
}

impl Story {
    /// First `max_chars` characters of the content, for chat previews.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview = self.content.chars().take(max_chars).collect::<String>();
        if self.content.chars().count() > max_chars {
            preview = format!("{}...", preview.trim_end());
        }

        return preview;
    }

    pub fn word_count(&self) -> usize {
        return self.content.split_whitespace().count();
    }
}

/// A story as it sits in the stories directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub metadata: StoryMetadata,
    #[serde(skip)]
    pub file_path: path::PathBuf,
}

impl StoryRecord {
    pub fn id(&self) -> String {
        return self
            .file_path
            .file_stem()
            .map(|stem| return stem.to_string_lossy().to_string())
            .unwrap_or_default();
    }

    pub fn into_story(self) -> Story {
        return Story {
            title: self.title,
            content: self.content,
            metadata: self.metadata,
        };
    }
}
