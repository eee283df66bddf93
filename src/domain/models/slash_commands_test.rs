use super::SlashCommand;

#[test]
fn it_ignores_plain_text() {
    assert!(SlashCommand::parse("A story about a lighthouse").is_none());
    assert!(SlashCommand::parse("save").is_none());
    assert!(SlashCommand::parse("   ").is_none());
    assert!(SlashCommand::parse("").is_none());
}

#[test]
fn it_ignores_unknown_commands() {
    assert!(SlashCommand::parse("/dance").is_none());
}

#[test]
fn it_parses_quit() {
    for text in ["/q", "/quit", "/exit", " /QUIT "] {
        let cmd = SlashCommand::parse(text).unwrap();
        assert!(cmd.is_quit());
        assert!(!cmd.is_help());
    }
}

#[test]
fn it_parses_help() {
    let cmd = SlashCommand::parse("/h").unwrap();
    assert!(cmd.is_help());
}

#[test]
fn it_parses_models() {
    let cmd = SlashCommand::parse("/ml").unwrap();
    assert!(cmd.is_model_list());
    assert!(!cmd.is_model_set());

    let cmd = SlashCommand::parse("/model llama-3.1-8b-instant").unwrap();
    assert!(cmd.is_model_set());
    assert_eq!(cmd.arg(), Some("llama-3.1-8b-instant"));
}

#[test]
fn it_parses_settings_updates() {
    let cmd = SlashCommand::parse("/temperature 0.9").unwrap();
    assert!(cmd.is_temperature());
    assert_eq!(cmd.arg(), Some("0.9"));

    let cmd = SlashCommand::parse("/length   1200").unwrap();
    assert!(cmd.is_word_count());
    assert_eq!(cmd.args, vec!["1200".to_string()]);

    let cmd = SlashCommand::parse("/settings").unwrap();
    assert!(cmd.is_settings());
    assert_eq!(cmd.arg(), None);
}

#[test]
fn it_parses_key_and_stories() {
    let cmd = SlashCommand::parse("/key gsk_abc").unwrap();
    assert!(cmd.is_key());
    assert_eq!(cmd.arg(), Some("gsk_abc"));

    let cmd = SlashCommand::parse("/stories").unwrap();
    assert!(cmd.is_stories());
}
