use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::wrap_text;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::Story;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

struct BubbleCacheEntry {
    text_len: usize,
    lines: Vec<Line<'static>>,
}

/// Everything shown in the chat pane: one bubble per message, followed by
/// the full story once there is one.
pub struct BubbleList {
    cache: HashMap<usize, BubbleCacheEntry>,
    story_lines: Vec<Line<'static>>,
    line_width: usize,
    lines_len: usize,
}

fn story_lines(story: &Story, line_width: usize) -> Vec<Line<'static>> {
    let width = line_width.saturating_sub(1).max(1);
    let heading = format!("━━ {} ", story.title);
    let heading_fill = "━".repeat(width.saturating_sub(heading.chars().count()));

    let mut details = vec![
        story.metadata.genre.to_string(),
        format!("{} words", story.word_count()),
    ];
    if !story.metadata.model.is_empty() {
        details.push(story.metadata.model.to_string());
    }
    if story.metadata.generation_time_seconds > 0.0 {
        details.push(format!(
            "generated in {:.2}s",
            story.metadata.generation_time_seconds
        ));
    }
    if story.metadata.last_revised_at.is_some() {
        details.push("revised".to_string());
    }

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{heading}{heading_fill}"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            details
                .iter()
                .filter(|detail| return !detail.is_empty())
                .map(|detail| return detail.to_string())
                .collect::<Vec<String>>()
                .join(" · "),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    lines.extend(
        wrap_text(&story.content, width.saturating_sub(1).max(1))
            .into_iter()
            .map(|line| return Line::from(format!(" {line}"))),
    );
    lines.push(Line::from(""));

    return lines;
}

impl Default for BubbleList {
    fn default() -> BubbleList {
        return BubbleList::new();
    }
}

impl BubbleList {
    pub fn new() -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            story_lines: vec![],
            line_width: 0,
            lines_len: 0,
        };
    }

    pub fn set_messages(&mut self, messages: &[Message], story: Option<&Story>, line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        let messages_len: usize = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if let Some(cache_entry) = self.cache.get(&idx) {
                    if message.text.len() == cache_entry.text_len {
                        return cache_entry.lines.len();
                    }
                }

                let mut align = BubbleAlignment::Left;
                if message.author == Author::User {
                    align = BubbleAlignment::Right;
                }

                let lines = Bubble::new(message, align, line_width).as_lines();
                let lines_len = lines.len();
                self.cache.insert(
                    idx,
                    BubbleCacheEntry {
                        text_len: message.text.len(),
                        lines,
                    },
                );

                return lines_len;
            })
            .sum();

        self.cache.retain(|idx, _| return *idx < messages.len());

        self.story_lines = story
            .map(|story| return story_lines(story, line_width))
            .unwrap_or_default();
        self.lines_len = messages_len + self.story_lines.len();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();

        return indexes
            .iter()
            .filter_map(|idx| return self.cache.get(idx))
            .flat_map(|entry| return entry.lines.to_owned())
            .chain(self.story_lines.to_owned())
            .collect();
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        frame.render_widget(
            Paragraph::new(self.lines())
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
