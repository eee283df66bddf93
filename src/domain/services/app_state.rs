#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;

use super::BubbleList;
use super::Conversation;
use super::Scroll;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::configuration::ALTERNATIVE_MODELS;
use crate::domain::models::Author;
use crate::domain::models::BackendName;
use crate::domain::models::Loading;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::SlashCommand;
use crate::domain::models::StoryError;
use crate::infrastructure::backends::BackendManager;

pub const MISSING_KEY_WARNING: &str =
    "No API key configured! Use /key YOUR_KEY or set GROQ_API_KEY";

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /settings (/s) - Shows the current model, creativity and story length.
- /modellist (/ml) - Lists all available models from the backend.
- /model (/m) [MODEL_NAME,MODEL_INDEX] - Sets the model used for new stories and revisions. You can pass either the model name, or the index from /modellist.
- /temperature (/t) [0.0-1.0] - Sets the creativity of the model. Higher is more adventurous.
- /length (/l) [300-2000] - Sets the approximate length of new stories in words.
- /key [API_KEY] - Sets the API key for the current backend for this run.
- /stories - Lists your saved stories.
- /quit /exit (/q) - Exit StoryChat.
- /help (/h) - Provides this help menu.

STORY COMMANDS:
Once a story is shown, tell StoryChat what to do next in your own words.
- "save" or "download" - Saves the story to your stories directory.
- "new", "another" or "start over" - Starts a new story.
- "revise", "change", "modify", "edit", "update" or "rewrite" - Asks for changes to the story.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

/// Everything the terminal UI draws, plus the one input waiting to be
/// processed.
pub struct AppState {
    pub conversation: Conversation,
    pub bubble_list: BubbleList,
    pub scroll: Scroll,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub pending_input: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(conversation: Conversation) -> AppState {
        let mut app_state = AppState {
            conversation,
            bubble_list: BubbleList::new(),
            scroll: Scroll::default(),
            last_known_height: 0,
            last_known_width: 0,
            pending_input: None,
            should_quit: false,
        };

        app_state.sync_dependants();
        return app_state;
    }

    /// True while an input or a generation is in flight. The UI shows the
    /// loading box instead of the input box during that time.
    pub fn is_working(&self) -> bool {
        return self.pending_input.is_some() || self.conversation.is_generating();
    }

    pub fn loading(&self) -> Loading {
        return Loading::new(self.conversation.state());
    }

    /// Title for the input box, and whether it is a warning.
    pub fn input_title(&self) -> (String, bool) {
        if !self.conversation.generator().has_credential() {
            return (MISSING_KEY_WARNING.to_string(), true);
        }

        return (self.conversation.state().placeholder().to_string(), false);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    /// Queues user input for processing on the next loop iteration. Returns
    /// false for blank input, which is dropped.
    pub fn queue_input(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || self.is_working() {
            return false;
        }

        self.pending_input = Some(text.to_string());
        return true;
    }

    pub async fn process_pending(&mut self) -> Result<()> {
        let input = match self.pending_input.take() {
            Some(input) => input,
            None => return Ok(()),
        };

        if let Some(command) = SlashCommand::parse(&input) {
            self.handle_slash_command(command).await?;
        } else {
            let res = self.conversation.submit(&input).await;
            log_story_result(res);
        }

        self.sync_dependants();
        self.scroll.last();

        return Ok(());
    }

    pub async fn generate(&mut self) {
        let res = self.conversation.generate().await;
        log_story_result(res);

        self.sync_dependants();
        self.scroll.last();
    }

    fn reply(&mut self, text: &str) {
        self.conversation
            .notify(Message::new(Author::Assistant, text));
    }

    fn reply_error(&mut self, text: &str) {
        self.conversation.notify(Message::new_with_type(
            Author::Assistant,
            MessageType::Error,
            text,
        ));
    }

    async fn model_list(&self) -> Vec<String> {
        match self.conversation.generator().list_models().await {
            Ok(models) if !models.is_empty() => return models,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Failed to list models, using built in list");
            }
        }

        let current = self.conversation.model_settings().model.to_string();
        let mut models = vec![current.to_string()];
        models.extend(
            ALTERNATIVE_MODELS
                .iter()
                .filter(|model| return **model != current)
                .map(|model| return model.to_string()),
        );

        return models;
    }

    async fn handle_slash_command(&mut self, command: SlashCommand) -> Result<()> {
        if command.is_key() {
            self.conversation
                .notify(Message::new(Author::User, "/key ********"));
        } else {
            let text = command.to_string();
            self.conversation.notify(Message::new(Author::User, &text));
        }

        if command.is_quit() {
            self.should_quit = true;
            return Ok(());
        }

        if command.is_help() {
            self.reply(&help_text());
            return Ok(());
        }

        if command.is_settings() {
            let settings = self.conversation.model_settings().describe();
            self.reply(&settings);
            return Ok(());
        }

        if command.is_model_list() {
            let models = self
                .model_list()
                .await
                .iter()
                .enumerate()
                .map(|(idx, model)| return format!("{}. {model}", idx + 1))
                .collect::<Vec<String>>()
                .join("\n");
            self.reply(&format!("Available models:\n\n{models}"));
            return Ok(());
        }

        if command.is_model_set() {
            let arg = match command.arg() {
                Some(arg) => arg.to_string(),
                None => {
                    self.reply_error("Pass a model name or its number from /modellist, for example `/model 2`.");
                    return Ok(());
                }
            };

            let models = self.model_list().await;
            let model = match arg.parse::<usize>() {
                Ok(idx) => match idx.checked_sub(1).and_then(|idx| return models.get(idx)) {
                    Some(model) => model.to_string(),
                    None => {
                        self.reply_error(&format!(
                            "{idx} is not a valid model number. Use /modellist to see the options."
                        ));
                        return Ok(());
                    }
                },
                Err(_) => arg,
            };

            Config::set(ConfigKey::Model, &model);
            self.conversation.model_settings_mut().model = model.to_string();
            self.reply(&format!("Model set to {model}."));
            return Ok(());
        }

        if command.is_temperature() {
            let res = command
                .arg()
                .unwrap_or_default()
                .parse::<f32>()
                .map_err(|_| {
                    return StoryError::InvalidSettings(
                        "temperature must be a number between 0.0 and 1.0".to_string(),
                    );
                })
                .and_then(|temperature| {
                    return self
                        .conversation
                        .model_settings_mut()
                        .set_temperature(temperature);
                });

            match res {
                Ok(_) => {
                    let temperature = self.conversation.model_settings().temperature();
                    self.reply(&format!("Creativity set to {temperature:.1}."));
                }
                Err(err) => self.reply_error(&err.to_string()),
            }
            return Ok(());
        }

        if command.is_word_count() {
            let res = command
                .arg()
                .unwrap_or_default()
                .parse::<u32>()
                .map_err(|_| {
                    return StoryError::InvalidSettings(
                        "story length must be a whole number of words".to_string(),
                    );
                })
                .and_then(|word_count| {
                    return self
                        .conversation
                        .model_settings_mut()
                        .set_word_count(word_count);
                });

            match res {
                Ok(_) => {
                    let word_count = self.conversation.model_settings().word_count();
                    self.reply(&format!("Stories will now be about {word_count} words long."));
                }
                Err(err) => self.reply_error(&err.to_string()),
            }
            return Ok(());
        }

        if command.is_key() {
            let token = match command.arg() {
                Some(token) => token.to_string(),
                None => {
                    self.reply_error("Pass your API key, for example `/key gsk_...`.");
                    return Ok(());
                }
            };

            let backend_name = self.conversation.generator().backend_name();
            let token_key = match backend_name {
                BackendName::Groq => ConfigKey::GroqToken,
                BackendName::OpenAI => ConfigKey::OpenaiToken,
            };
            Config::set(token_key, &token);

            let backend = BackendManager::get_with_token(backend_name, &token)?;
            self.conversation.generator_mut().set_backend(backend);
            self.reply(&format!(
                "API key set for {backend_name}. It will be used until you quit."
            ));
            return Ok(());
        }

        if command.is_stories() {
            let records = self.conversation.stories().list().await;
            match records {
                Ok(records) if records.is_empty() => {
                    self.reply("You haven't saved any stories yet.");
                }
                Ok(records) => {
                    let list = records
                        .iter()
                        .map(|record| {
                            let genre = record.metadata.genre.to_string();
                            let date = record
                                .timestamp
                                .split('T')
                                .next()
                                .unwrap_or_default()
                                .to_string();
                            return format!("- {} ({genre}, {date})", record.title);
                        })
                        .collect::<Vec<String>>()
                        .join("\n");
                    self.reply(&format!(
                        "Your saved stories:\n\n{list}\n\nOpen one with `storychat stories open`."
                    ));
                }
                Err(err) => {
                    self.reply_error(&format!("I couldn't read your saved stories ({err})."));
                }
            }
            return Ok(());
        }

        return Ok(());
    }

    fn sync_dependants(&mut self) {
        self.bubble_list.set_messages(
            self.conversation.messages(),
            self.conversation.story(),
            self.last_known_width as usize,
        );

        self.scroll
            .set_state(self.bubble_list.len() as u16, self.last_known_height);
    }
}

fn log_story_result(res: Result<(), StoryError>) {
    match res {
        Ok(_) | Err(StoryError::InvalidInput) => {}
        Err(err) => {
            tracing::debug!(error = %err, "Conversation step ended with an error");
        }
    }
}
