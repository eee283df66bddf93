use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;

/// Where a session is in the story script. Slot collection is strictly
/// linear; only `Display` and `Revising` loop back on each other.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConversationState {
    #[default]
    Welcome,
    Genre,
    Characters,
    Setting,
    Theme,
    Title,
    Generating,
    Display,
    Revising,
}

impl ConversationState {
    /// States in which the session must hold a generated story.
    pub fn has_story(&self) -> bool {
        return matches!(self, ConversationState::Display | ConversationState::Revising);
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ConversationState::Genre => {
                return "Enter a genre (e.g., Fantasy, Sci-Fi, Mystery)...";
            }
            ConversationState::Characters => return "Describe your characters...",
            ConversationState::Setting => return "Describe the setting or world...",
            ConversationState::Theme => return "Enter a theme or message (or 'skip')...",
            ConversationState::Title => {
                return "Enter a title (or 'skip' to auto-generate)...";
            }
            ConversationState::Revising => {
                return "Describe what changes you'd like to make...";
            }
            _ => return "Type your message here...",
        }
    }
}
