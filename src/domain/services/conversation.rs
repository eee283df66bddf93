#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use crate::configuration::GENRE_OPTIONS;
use crate::domain::models::now_rfc3339;
use crate::domain::models::Author;
use crate::domain::models::ConversationState;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::ModelSettings;
use crate::domain::models::Session;
use crate::domain::models::Story;
use crate::domain::models::StoryError;

use super::Stories;
use super::StoryGenerator;

const WELCOME: &str = "Hello! I'm your AI storyteller. I can help you create custom stories. Would you like to start crafting a story together?";
const DISPLAY_HELP: &str = "What would you like to do with this story? You can save it, start a new one, or ask for specific changes.";

const SAVE_WORDS: [&str; 2] = ["save", "download"];
const NEW_WORDS: [&str; 3] = ["new", "another", "start over"];
const REVISE_WORDS: [&str; 6] = ["revise", "change", "modify", "edit", "update", "rewrite"];

fn genre_options() -> String {
    let (last, rest) = match GENRE_OPTIONS.split_last() {
        Some(split) => split,
        None => return "".to_string(),
    };

    return format!("{}, or {last}", rest.join(", "));
}

fn is_skip(text: &str) -> bool {
    return text.eq_ignore_ascii_case("skip");
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    return words.iter().any(|word| return text.contains(word));
}

/// The story script for a single session. Owns the session, the generator
/// that writes stories and the store they are saved to.
pub struct Conversation {
    session: Session,
    generator: StoryGenerator,
    stories: Stories,
}

impl Conversation {
    pub fn new(
        generator: StoryGenerator,
        stories: Stories,
        model_settings: ModelSettings,
    ) -> Conversation {
        let mut session = Session::new(model_settings);
        session
            .chat_history
            .push(Message::new(Author::Assistant, WELCOME));

        return Conversation {
            session,
            generator,
            stories,
        };
    }

    pub fn session(&self) -> &Session {
        return &self.session;
    }

    pub fn state(&self) -> ConversationState {
        return self.session.state;
    }

    pub fn messages(&self) -> &[Message] {
        return &self.session.chat_history;
    }

    pub fn story(&self) -> Option<&Story> {
        return self.session.generated_story.as_ref();
    }

    pub fn is_generating(&self) -> bool {
        return self.session.state == ConversationState::Generating;
    }

    pub fn model_settings(&self) -> &ModelSettings {
        return &self.session.model_settings;
    }

    pub fn model_settings_mut(&mut self) -> &mut ModelSettings {
        return &mut self.session.model_settings;
    }

    pub fn generator(&self) -> &StoryGenerator {
        return &self.generator;
    }

    pub fn generator_mut(&mut self) -> &mut StoryGenerator {
        return &mut self.generator;
    }

    pub fn stories(&self) -> &Stories {
        return &self.stories;
    }

    /// Appends a message that is not part of the script, such as replies to
    /// slash commands.
    pub fn notify(&mut self, message: Message) {
        self.session.chat_history.push(message);
    }

    fn reply(&mut self, text: &str) {
        self.notify(Message::new(Author::Assistant, text));
    }

    fn reply_error(&mut self, text: &str) {
        self.notify(Message::new_with_type(
            Author::Assistant,
            MessageType::Error,
            text,
        ));
    }

    /// Shows a saved story as if it had just been generated.
    pub fn load_story(&mut self, story: Story) {
        let title = story.title.to_string();
        self.session.load_story(story);
        self.reply(&format!("I've loaded \"{title}\". {DISPLAY_HELP}"));
    }

    /// Feeds one line of user input through the script. Empty input, input
    /// while a story is being generated, and revisions without a story are
    /// rejected with `InvalidInput` and leave the session untouched. "skip"
    /// moves past theme and title without touching what was there.
    pub async fn submit(&mut self, input: &str) -> Result<(), StoryError> {
        let text = input.trim();
        if text.is_empty() || self.is_generating() {
            return Err(StoryError::InvalidInput);
        }
        if self.session.state == ConversationState::Revising
            && self.session.generated_story.is_none()
        {
            return Err(StoryError::InvalidInput);
        }

        self.notify(Message::new(Author::User, text));
        tracing::debug!(state = %self.session.state, "Conversation input");

        match self.session.state {
            ConversationState::Welcome => {
                self.reply(&format!(
                    "Great! Let's create a story together. What genre would you like? Choose from {}, or suggest your own!",
                    genre_options()
                ));
                self.session.state = ConversationState::Genre;
            }
            ConversationState::Genre => {
                self.session.genre = Some(text.to_string());
                self.reply(&format!("A {text} story sounds fun! Now, tell me about the main characters. Who should be in this story? Include their names, relationships, and a brief description."));
                self.session.state = ConversationState::Characters;
            }
            ConversationState::Characters => {
                self.session.characters = Some(text.to_string());
                self.reply("Interesting characters! Next, describe the setting or world where this story takes place.");
                self.session.state = ConversationState::Setting;
            }
            ConversationState::Setting => {
                self.session.setting = Some(text.to_string());
                self.reply("Great setting! Finally, do you have a theme or message you'd like to explore in this story? (Or type 'skip' to proceed without a theme)");
                self.session.state = ConversationState::Theme;
            }
            ConversationState::Theme => {
                if !is_skip(text) {
                    self.session.theme = Some(text.to_string());
                }
                self.reply("Would you like to provide a title for your story? (Or type 'skip' to let me generate one for you)");
                self.session.state = ConversationState::Title;
            }
            ConversationState::Title => {
                if !is_skip(text) {
                    self.session.title = Some(text.to_string());
                }

                let titled = self
                    .session
                    .title
                    .as_ref()
                    .map(|title| return format!(" titled \"{title}\""))
                    .unwrap_or_default();
                self.reply(&format!(
                    "Perfect! I'm working on your {} story{titled} about {} set in {}. This will take a moment...",
                    self.session.genre.clone().unwrap_or_default(),
                    self.session.characters.clone().unwrap_or_default(),
                    self.session.setting.clone().unwrap_or_default(),
                ));
                self.session.state = ConversationState::Generating;
            }
            ConversationState::Display => {
                return self.handle_display_command(&text.to_lowercase()).await;
            }
            ConversationState::Revising => {
                return self.revise(text).await;
            }
            ConversationState::Generating => {}
        }

        return Ok(());
    }

    async fn handle_display_command(&mut self, command: &str) -> Result<(), StoryError> {
        if contains_any(command, &SAVE_WORDS) {
            return self.save().await;
        }

        if contains_any(command, &NEW_WORDS) {
            self.session.reset();
            self.reply("Let's create a new story! What genre would you like for this one?");
            return Ok(());
        }

        if contains_any(command, &REVISE_WORDS) {
            self.session.state = ConversationState::Revising;
            self.reply(
                "I'll help you modify the story. Please tell me what changes you'd like to make.",
            );
            return Ok(());
        }

        self.reply(DISPLAY_HELP);
        return Ok(());
    }

    async fn save(&mut self) -> Result<(), StoryError> {
        let story = match &self.session.generated_story {
            Some(story) => story.clone(),
            None => {
                return Err(StoryError::Persistence("there is no story to save".to_string()));
            }
        };

        let res = self
            .stories
            .save(&story, &self.session.id, &self.session.timestamp)
            .await;

        match res {
            Ok(file_path) => {
                self.reply(&format!(
                    "I've saved your story to {}! What would you like to do next? You can start a new story, or make changes to this one.",
                    file_path.to_string_lossy()
                ));
                return Ok(());
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to save story");
                self.reply_error(&format!("Sorry, I couldn't save your story ({err})."));
                return Err(err);
            }
        }
    }

    async fn revise(&mut self, instruction: &str) -> Result<(), StoryError> {
        let original = match &self.session.generated_story {
            Some(story) => story.content.to_string(),
            None => return Err(StoryError::InvalidInput),
        };

        let res = self
            .generator
            .expand_story(
                &original,
                instruction,
                &self.session.model_settings.model,
                self.session.model_settings.temperature(),
            )
            .await;

        match res {
            Ok(content) => {
                if let Some(story) = self.session.generated_story.as_mut() {
                    story.content = content;
                    story.metadata.last_revised_at = Some(now_rfc3339());
                }
                self.session.state = ConversationState::Display;
                self.reply("I've updated your story with the requested changes. What would you like to do next?");
                return Ok(());
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to revise story");
                self.reply_error(&format!("I'm sorry, I had trouble updating the story: {err}\n\nWould you like to try again with a different request?"));
                return Err(err);
            }
        }
    }

    /// Runs the pending generation. Only valid right after the title step.
    /// On failure the session falls back to the setting step with every slot
    /// kept.
    pub async fn generate(&mut self) -> Result<(), StoryError> {
        if !self.is_generating() {
            return Err(StoryError::InvalidInput);
        }

        let res = match self.session.story_request() {
            Some(request) => self.generator.generate_story(&request).await,
            None => Err(StoryError::Generation(
                "genre, characters and setting are required".to_string(),
            )),
        };

        match res {
            Ok(story) => {
                if self.session.title.is_none() {
                    self.session.title = Some(story.title.to_string());
                }
                self.reply(&format!(
                    "Here is \"{}\":\n\n{}\n\n(full story shown below)\n\n{DISPLAY_HELP}",
                    story.title,
                    story.preview(200)
                ));
                self.session.generated_story = Some(story);
                self.session.state = ConversationState::Display;
                return Ok(());
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to generate story");
                self.reply_error(&format!("I'm sorry, I had trouble generating your story: {err}\n\nWould you like to try again? Describe the setting once more and I'll pick it up from there."));
                self.session.state = ConversationState::Setting;
                return Err(err);
            }
        }
    }
}
