use anyhow::Result;
use tempfile::TempDir;
use test_utils::story_fixture;

use super::AppState;
use super::MISSING_KEY_WARNING;
use crate::configuration::ALTERNATIVE_MODELS;
use crate::domain::models::Author;
use crate::domain::models::ConversationState;
use crate::domain::models::MessageType;
use crate::domain::models::ModelSettings;
use crate::domain::services::Conversation;
use crate::domain::services::Stories;
use crate::domain::services::StoryGenerator;
use crate::infrastructure::backends::scripted::Scripted;

fn new_app_state(backend: Scripted) -> Result<(AppState, TempDir)> {
    let dir = tempfile::tempdir()?;
    let conversation = Conversation::new(
        StoryGenerator::new(Box::new(backend)),
        Stories::new(dir.path().to_path_buf()),
        ModelSettings::new("llama-3.3-70b-versatile", 0.7, 800)?,
    );

    let mut app_state = AppState::new(conversation);
    app_state.last_known_width = 100;
    app_state.last_known_height = 300;

    return Ok((app_state, dir));
}

async fn send(app_state: &mut AppState, text: &str) -> Result<()> {
    assert!(app_state.queue_input(text));
    app_state.process_pending().await?;

    return Ok(());
}

fn last_message(app_state: &AppState) -> (String, MessageType) {
    let message = app_state.conversation.messages().last().unwrap();
    return (message.text.to_string(), message.message_type());
}

#[test]
fn it_drops_blank_input() -> Result<()> {
    let (mut app_state, _dir) = new_app_state(Scripted::new())?;

    assert!(!app_state.queue_input("   "));
    assert!(app_state.pending_input.is_none());
    assert!(!app_state.is_working());

    return Ok(());
}

#[test]
fn it_queues_one_input_at_a_time() -> Result<()> {
    let (mut app_state, _dir) = new_app_state(Scripted::new())?;

    assert!(app_state.queue_input("hello"));
    assert!(app_state.is_working());
    assert!(!app_state.queue_input("again"));
    assert_eq!(app_state.pending_input, Some("hello".to_string()));

    return Ok(());
}

#[test]
fn it_shows_placeholders_or_a_key_warning() -> Result<()> {
    let (app_state, _dir) = new_app_state(Scripted::new())?;
    assert_eq!(
        app_state.input_title(),
        ("Type your message here...".to_string(), false)
    );

    let (app_state, _dir) = new_app_state(Scripted::without_credential())?;
    assert_eq!(
        app_state.input_title(),
        (MISSING_KEY_WARNING.to_string(), true)
    );

    return Ok(());
}

#[tokio::test]
async fn it_passes_text_to_the_conversation() -> Result<()> {
    let (mut app_state, _dir) = new_app_state(Scripted::new())?;

    send(&mut app_state, "let's go").await?;
    send(&mut app_state, "Mystery").await?;

    assert_eq!(
        app_state.conversation.state(),
        ConversationState::Characters
    );
    assert_eq!(
        app_state.input_title().0,
        "Describe your characters...".to_string()
    );
    assert!(!app_state.is_working());

    return Ok(());
}

#[tokio::test]
async fn it_generates_after_the_title() -> Result<()> {
    let (mut app_state, _dir) = new_app_state(Scripted::new().reply(story_fixture()))?;
    for text in ["hi", "Fantasy", "A keeper", "An island", "skip", "skip"] {
        send(&mut app_state, text).await?;
    }

    assert!(app_state.is_working());
    let lines_before = app_state.bubble_list.len();

    app_state.generate().await;
    assert_eq!(app_state.conversation.state(), ConversationState::Display);
    assert!(!app_state.is_working());
    assert!(app_state.bubble_list.len() > lines_before + 10);

    return Ok(());
}

mod handle_slash_commands {
    use super::*;

    #[tokio::test]
    async fn it_quits() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::new())?;
        send(&mut app_state, "/q").await?;

        assert!(app_state.should_quit);
        assert_eq!(app_state.conversation.state(), ConversationState::Welcome);

        return Ok(());
    }

    #[tokio::test]
    async fn it_shows_help() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::new())?;
        send(&mut app_state, "/help").await?;

        let (text, _) = last_message(&app_state);
        assert!(text.starts_with("COMMANDS:"));
        assert!(text.contains("/temperature (/t)"));

        return Ok(());
    }

    #[tokio::test]
    async fn it_keeps_the_conversation_state() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::new())?;
        send(&mut app_state, "hi").await?;
        send(&mut app_state, "Horror").await?;
        send(&mut app_state, "/settings").await?;

        assert_eq!(
            app_state.conversation.state(),
            ConversationState::Characters
        );
        let messages = app_state.conversation.messages();
        assert_eq!(messages[messages.len() - 2].author, Author::User);
        assert_eq!(messages[messages.len() - 2].text, "/settings");

        let (text, _) = last_message(&app_state);
        insta::assert_snapshot!(text, @r###"
        Model: llama-3.3-70b-versatile
        Creativity (temperature): 0.7
        Story length: ~800 words
        "###);

        return Ok(());
    }

    #[tokio::test]
    async fn it_sets_temperature() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::new())?;

        send(&mut app_state, "/temperature 0.9").await?;
        assert_eq!(
            app_state.conversation.model_settings().temperature(),
            0.9
        );
        assert_eq!(
            last_message(&app_state),
            ("Creativity set to 0.9.".to_string(), MessageType::Normal)
        );

        send(&mut app_state, "/t 1.5").await?;
        assert_eq!(
            app_state.conversation.model_settings().temperature(),
            0.9
        );
        assert_eq!(last_message(&app_state).1, MessageType::Error);

        send(&mut app_state, "/t warm").await?;
        assert_eq!(last_message(&app_state).1, MessageType::Error);

        return Ok(());
    }

    #[tokio::test]
    async fn it_sets_word_count() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::new())?;

        send(&mut app_state, "/length 1200").await?;
        assert_eq!(app_state.conversation.model_settings().word_count(), 1200);

        send(&mut app_state, "/l 100").await?;
        assert_eq!(app_state.conversation.model_settings().word_count(), 1200);
        assert_eq!(last_message(&app_state).1, MessageType::Error);

        send(&mut app_state, "/l").await?;
        assert_eq!(last_message(&app_state).1, MessageType::Error);

        return Ok(());
    }

    #[tokio::test]
    async fn it_lists_models() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::with_models(vec![
            "gemma2-9b-it",
            "llama-3.3-70b-versatile",
        ]))?;
        send(&mut app_state, "/ml").await?;

        let (text, _) = last_message(&app_state);
        insta::assert_snapshot!(text, @r###"
        Available models:

        1. gemma2-9b-it
        2. llama-3.3-70b-versatile
        "###);

        return Ok(());
    }

    #[tokio::test]
    async fn it_falls_back_to_known_models() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::new())?;
        send(&mut app_state, "/modellist").await?;

        let (text, _) = last_message(&app_state);
        assert!(text.contains("1. llama-3.3-70b-versatile"));
        for model in ALTERNATIVE_MODELS {
            assert!(text.contains(model));
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_sets_models_by_index_or_name() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::with_models(vec![
            "gemma2-9b-it",
            "llama-3.3-70b-versatile",
        ]))?;

        send(&mut app_state, "/model 1").await?;
        assert_eq!(app_state.conversation.model_settings().model, "gemma2-9b-it");

        send(&mut app_state, "/m 7").await?;
        assert_eq!(app_state.conversation.model_settings().model, "gemma2-9b-it");
        assert_eq!(last_message(&app_state).1, MessageType::Error);

        send(&mut app_state, "/m llama-3.1-8b-instant").await?;
        assert_eq!(
            app_state.conversation.model_settings().model,
            "llama-3.1-8b-instant"
        );

        return Ok(());
    }

    #[tokio::test]
    async fn it_sets_an_api_key_without_echoing_it() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::without_credential())?;
        assert!(app_state.input_title().1);

        send(&mut app_state, "/key gsk_secret").await?;
        assert!(app_state.conversation.generator().has_credential());
        assert!(!app_state.input_title().1);
        assert!(app_state
            .conversation
            .messages()
            .iter()
            .all(|message| return !message.text.contains("gsk_secret")));

        return Ok(());
    }

    #[tokio::test]
    async fn it_lists_saved_stories() -> Result<()> {
        let (mut app_state, _dir) = new_app_state(Scripted::new().reply(story_fixture()))?;

        send(&mut app_state, "/stories").await?;
        assert_eq!(
            last_message(&app_state).0,
            "You haven't saved any stories yet."
        );

        for text in ["hi", "Fantasy", "A keeper", "An island", "skip", "skip"] {
            send(&mut app_state, text).await?;
        }
        app_state.generate().await;
        send(&mut app_state, "save").await?;

        send(&mut app_state, "/stories").await?;
        let (text, _) = last_message(&app_state);
        assert!(text.contains("- The Lighthouse at Grey Point (Fantasy, "));

        return Ok(());
    }
}
