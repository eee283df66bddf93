use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

fn lines_to_string(message: &Message, alignment: BubbleAlignment, width: usize) -> String {
    return Bubble::new(message, alignment, width)
        .as_lines()
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| return span.content.to_string())
                .collect::<Vec<String>>()
                .join("");
        })
        .collect::<Vec<String>>()
        .join("\n");
}

#[test]
fn it_draws_a_short_bubble() {
    let message = Message::new(Author::Assistant, "Hi there!");
    let lines_str = lines_to_string(&message, BubbleAlignment::Left, 50);
    insta::assert_snapshot!(lines_str, @r###"
    ╭StoryChat──╮
    │ Hi there! │
    ╰───────────╯
    "###);
}

#[test]
fn it_wraps_long_text() {
    let message = Message::new(
        Author::Assistant,
        "Once upon a time, in a lighthouse at the edge of the world, there lived a keeper who never slept.",
    );
    let lines_str = lines_to_string(&message, BubbleAlignment::Left, 50);
    insta::assert_snapshot!(lines_str, @r###"
    ╭StoryChat────────────────────────────────────╮
    │ Once upon a time, in a lighthouse at the    │
    │ edge of the world, there lived a keeper who │
    │ never slept.                                │
    ╰─────────────────────────────────────────────╯
    "###);
}

#[test]
fn it_keeps_blank_lines() {
    let message = Message::new(Author::Assistant, "First paragraph.\n\nSecond one.");
    let lines_str = lines_to_string(&message, BubbleAlignment::Left, 50);
    insta::assert_snapshot!(lines_str, @r###"
    ╭StoryChat─────────╮
    │ First paragraph. │
    │                  │
    │ Second one.      │
    ╰──────────────────╯
    "###);
}

#[test]
fn it_aligns_user_bubbles_right() {
    let message = Message::new(Author::User, "A lighthouse keeper");
    let lines = Bubble::new(&message, BubbleAlignment::Right, 50).as_lines();
    assert_eq!(lines.len(), 3);

    for line in lines {
        let text = line
            .spans
            .iter()
            .map(|span| return span.content.to_string())
            .collect::<String>();
        assert!(text.starts_with("   "));
        assert_eq!(text.chars().count(), 49);
    }
}

#[test]
fn it_colours_errors_red() {
    let message = Message::new_with_type(Author::Assistant, MessageType::Error, "Oops");
    let lines = Bubble::new(&message, BubbleAlignment::Left, 50).as_lines();

    for line in lines {
        for span in line.spans.iter().filter(|span| return !span.content.is_empty()) {
            assert_eq!(span.style.fg, Some(ratatui::style::Color::Red));
        }
    }
}
