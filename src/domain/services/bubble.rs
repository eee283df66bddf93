#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

// Left border, left padding, right padding, right border, scrollbar.
const BORDER_ELEMENTS_LENGTH: usize = 5;
const OUTER_PADDING_PERCENTAGE: f32 = 0.04;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

/// A single chat message drawn as a bordered speech bubble with the author's
/// name in the top border.
pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    fn max_text_width(&self) -> usize {
        let outer_padding =
            (self.window_max_width as f32 * OUTER_PADDING_PERCENTAGE).ceil() as usize;

        return self
            .window_max_width
            .saturating_sub(BORDER_ELEMENTS_LENGTH + outer_padding)
            .max(1);
    }

    fn border_style(&self) -> Style {
        if self.message.message_type() == MessageType::Error {
            return Style::default().fg(Color::Red);
        }
        if self.message.author == Author::Assistant {
            return Style::default().fg(Color::Rgb(138, 85, 63));
        }

        return Style::default();
    }

    fn text_style(&self) -> Style {
        if self.message.message_type() == MessageType::Error {
            return Style::default().fg(Color::Red);
        }

        return Style::default();
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let username = self.message.author.to_string();
        let text_lines = self.message.as_string_lines(self.max_text_width());

        let inner_width = text_lines
            .iter()
            .map(|line| return line.chars().count())
            .chain([username.chars().count()])
            .max()
            .unwrap_or_default();

        let bubble_width = inner_width + 4;
        let outer_padding = match self.alignment {
            BubbleAlignment::Left => "".to_string(),
            BubbleAlignment::Right => " ".repeat(
                self.window_max_width
                    .saturating_sub(bubble_width + 1),
            ),
        };

        let border_style = self.border_style();
        let text_style = self.text_style();
        let dashes = |count: usize| return "─".repeat(count);

        let mut lines = vec![Line::from(vec![
            Span::from(outer_padding.to_string()),
            Span::styled(
                format!(
                    "╭{username}{}╮",
                    dashes((inner_width + 2).saturating_sub(username.chars().count()))
                ),
                border_style,
            ),
        ])];

        for text in text_lines {
            let fill = " ".repeat(inner_width.saturating_sub(text.chars().count()));
            lines.push(Line::from(vec![
                Span::from(outer_padding.to_string()),
                Span::styled("│ ".to_string(), border_style),
                Span::styled(text, text_style),
                Span::styled(format!("{fill} │"), border_style),
            ]));
        }

        lines.push(Line::from(vec![
            Span::from(outer_padding),
            Span::styled(format!("╰{}╯", dashes(inner_width + 2)), border_style),
        ]));

        return lines;
    }
}
