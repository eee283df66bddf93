use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::ConversationState;

pub struct Loading {
    text: &'static str,
}

impl Loading {
    pub fn new(state: ConversationState) -> Loading {
        let text = match state {
            ConversationState::Generating => {
                "Generating your story... This may take a moment."
            }
            ConversationState::Revising => "Revising your story...",
            _ => "Thinking...",
        };

        return Loading { text };
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect) {
        frame.render_widget(
            Paragraph::new(self.text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}
