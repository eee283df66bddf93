use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub struct TextArea {}

impl<'a> TextArea {
    /// Input box titled with the hint for the current step. A warning title
    /// is drawn in yellow.
    pub fn new(title: &str, warning: bool) -> tui_textarea::TextArea<'a> {
        let mut border_style = Style::default();
        if warning {
            border_style = border_style.fg(Color::Yellow);
        }

        let mut textarea = tui_textarea::TextArea::default();
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(border_style)
                .title(title.to_string())
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }
}
