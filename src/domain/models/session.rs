#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use chrono::Local;
use chrono::SecondsFormat;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::ConversationState;
use super::Message;
use super::ModelSettings;
use super::Story;
use super::StoryRequest;

pub fn now_rfc3339() -> String {
    return Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
}

/// One user's pass through the story script, from welcome to saved story.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub timestamp: String,
    pub state: ConversationState,
    pub genre: Option<String>,
    pub characters: Option<String>,
    pub setting: Option<String>,
    pub theme: Option<String>,
    pub title: Option<String>,
    pub chat_history: Vec<Message>,
    pub generated_story: Option<Story>,
    pub model_settings: ModelSettings,
}

impl Session {
    pub fn new(model_settings: ModelSettings) -> Session {
        return Session {
            id: Session::create_id(),
            timestamp: now_rfc3339(),
            state: ConversationState::Welcome,
            genre: None,
            characters: None,
            setting: None,
            theme: None,
            title: None,
            chat_history: vec![],
            generated_story: None,
            model_settings,
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    /// Clears every story slot and the generated story and starts a fresh
    /// identity. Chat history and model settings survive.
    pub fn reset(&mut self) {
        self.id = Session::create_id();
        self.timestamp = now_rfc3339();
        self.state = ConversationState::Genre;
        self.genre = None;
        self.characters = None;
        self.setting = None;
        self.theme = None;
        self.title = None;
        self.generated_story = None;
    }

    /// Puts a previously saved story on screen, restoring its slots.
    pub fn load_story(&mut self, story: Story) {
        self.genre = Some(story.metadata.genre.to_string());
        self.characters = Some(story.metadata.characters.to_string());
        self.setting = Some(story.metadata.setting.to_string());
        self.theme = story.metadata.theme.clone();
        self.title = Some(story.title.to_string());
        self.generated_story = Some(story);
        self.state = ConversationState::Display;
    }

    /// Builds the generation request from the collected slots. Returns `None`
    /// while any of genre, characters or setting is still missing.
    pub fn story_request(&self) -> Option<StoryRequest> {
        let genre = self.genre.as_ref()?;
        let characters = self.characters.as_ref()?;
        let setting = self.setting.as_ref()?;

        return Some(StoryRequest {
            title: self.title.clone(),
            genre: genre.to_string(),
            characters: characters.to_string(),
            setting: setting.to_string(),
            theme: self.theme.clone(),
            word_count: self.model_settings.word_count(),
            temperature: self.model_settings.temperature(),
            model: self.model_settings.model.to_string(),
        });
    }
}
