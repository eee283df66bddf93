use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendName;
use crate::domain::models::ModelSettings;
use crate::domain::models::TextArea;
use crate::domain::services::AppState;
use crate::domain::services::Conversation;
use crate::domain::services::Stories;
use crate::domain::services::StoryGenerator;
use crate::infrastructure::backends::BackendManager;

fn new_textarea<'a>(app_state: &AppState) -> tui_textarea::TextArea<'a> {
    let (title, warning) = app_state.input_title();
    return TextArea::new(&title, warning);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
) -> Result<()> {
    let mut textarea = new_textarea(app_state);

    loop {
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
                .split(frame.size());

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            app_state
                .bubble_list
                .render(frame, layout[0], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            if app_state.is_working() {
                app_state.loading().render(frame, layout[1]);
            } else {
                frame.render_widget(textarea.widget(), layout[1]);
            }
        })?;

        if app_state.should_quit {
            break;
        }

        // The loading box is on screen at this point, so slow work happens
        // after it has been drawn.
        if app_state.pending_input.is_some() {
            app_state.process_pending().await?;
            textarea = new_textarea(app_state);
            continue;
        }

        if app_state.conversation.is_generating() {
            app_state.generate().await;
            textarea = new_textarea(app_state);
            continue;
        }

        match crossterm::event::read()?.into() {
            Input { key: Key::Down, .. } => {
                app_state.scroll.down();
            }
            Input { key: Key::Up, .. } => {
                app_state.scroll.up();
            }
            Input {
                key: Key::Char('d'),
                ctrl: true,
                ..
            } => {
                app_state.scroll.down_page();
            }
            Input {
                key: Key::Char('u'),
                ctrl: true,
                ..
            } => {
                app_state.scroll.up_page();
            }
            Input {
                key: Key::Char('c'),
                ctrl: true,
                ..
            } => {
                break;
            }
            Input {
                key: Key::Enter, ..
            } => {
                let input_str = textarea.lines().join("\n");
                if app_state.queue_input(&input_str) {
                    textarea = new_textarea(app_state);
                }
            }
            input => {
                textarea.input(input);
            }
        }
    }

    return Ok(());
}

/// Builds the conversation from the loaded configuration. When a saved story
/// was picked on the command line it starts out on screen.
async fn create_conversation() -> Result<Conversation> {
    let backend_name =
        BackendName::parse(Config::get(ConfigKey::Backend)).unwrap_or(BackendName::Groq);
    let generator = StoryGenerator::new(BackendManager::get(backend_name)?);
    let stories = Stories::default();

    let story_file = Config::get(ConfigKey::StoryFile);
    let record = if story_file.is_empty() {
        None
    } else {
        Some(stories.load(&story_file).await?)
    };

    let mut conversation = Conversation::new(generator, stories, ModelSettings::from_config()?);
    if let Some(record) = record {
        conversation.load_story(record.into_story());
    }

    return Ok(conversation);
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start() -> Result<()> {
    let mut app_state = AppState::new(create_conversation().await?);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut app_state).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return res;
}
