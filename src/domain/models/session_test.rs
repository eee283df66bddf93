use anyhow::Result;

use super::Session;
use crate::domain::models::ConversationState;
use crate::domain::models::ModelSettings;
use crate::domain::models::Story;
use crate::domain::models::StoryMetadata;

fn session() -> Result<Session> {
    return Ok(Session::new(ModelSettings::new("llama", 0.7, 800)?));
}

#[test]
fn it_creates_short_ids() {
    let id = Session::create_id();
    assert_eq!(id.split('-').count(), 2);
    assert_eq!(id.len(), 13);
}

#[test]
fn it_starts_at_welcome() -> Result<()> {
    let session = session()?;
    assert_eq!(session.state, ConversationState::Welcome);
    assert!(session.chat_history.is_empty());
    assert!(session.generated_story.is_none());

    return Ok(());
}

#[test]
fn it_has_no_request_until_required_slots_are_filled() -> Result<()> {
    let mut session = session()?;
    session.genre = Some("Fantasy".to_string());
    session.characters = Some("A knight".to_string());
    assert!(session.story_request().is_none());

    session.setting = Some("A castle".to_string());
    let request = session.story_request().unwrap();
    assert_eq!(request.genre, "Fantasy");
    assert_eq!(request.title, None);
    assert_eq!(request.theme, None);
    assert_eq!(request.word_count, 800);
    assert_eq!(request.temperature, 0.7);
    assert_eq!(request.model, "llama");

    return Ok(());
}

#[test]
fn it_resets_slots_and_identity() -> Result<()> {
    let mut session = session()?;
    let old_id = session.id.to_string();
    session.genre = Some("Fantasy".to_string());
    session.theme = Some("Courage".to_string());
    session.title = Some("The Knight".to_string());
    session.state = ConversationState::Display;
    session.generated_story = Some(Story {
        title: "The Knight".to_string(),
        content: "Once".to_string(),
        metadata: StoryMetadata::default(),
    });

    session.reset();

    assert_ne!(session.id, old_id);
    assert_eq!(session.state, ConversationState::Genre);
    assert!(session.genre.is_none());
    assert!(session.theme.is_none());
    assert!(session.title.is_none());
    assert!(session.generated_story.is_none());
    assert_eq!(session.model_settings.word_count(), 800);

    return Ok(());
}

#[test]
fn it_loads_a_saved_story() -> Result<()> {
    let mut session = session()?;
    session.load_story(Story {
        title: "The Knight".to_string(),
        content: "Once".to_string(),
        metadata: StoryMetadata {
            genre: "Fantasy".to_string(),
            characters: "A knight".to_string(),
            setting: "A castle".to_string(),
            theme: None,
            ..StoryMetadata::default()
        },
    });

    assert_eq!(session.state, ConversationState::Display);
    assert_eq!(session.title.as_deref(), Some("The Knight"));
    assert_eq!(session.genre.as_deref(), Some("Fantasy"));
    assert!(session.theme.is_none());
    assert!(session.generated_story.is_some());

    return Ok(());
}
