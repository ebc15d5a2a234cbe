//! Title, postcode input and status line

use crate::app::AppState;
use crate::lookup_state::LookupState;
use crate::theme::{Styles, Theme, UiText};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_title(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(UiText::APP_TITLE, Styles::title())),
        Line::from(Span::styled(UiText::SUBTITLE, Styles::text_muted())),
    ];
    let title = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Styles::border_inactive()),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

pub fn render_input(f: &mut Frame, area: Rect, state: &AppState) {
    let lookup = state.session.state();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::input_border(lookup))
        .title(UiText::INPUT_TITLE);

    let text = if state.input.value().is_empty() {
        Span::styled(UiText::INPUT_PLACEHOLDER, Styles::text_muted())
    } else {
        Span::styled(state.input.value(), Styles::value())
    };
    f.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if !state.help_visible && area.width > 2 && area.height > 2 {
        let max_x = area.x + area.width - 2;
        let cursor_x = (area.x + 1).saturating_add(state.input.cursor() as u16).min(max_x);
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// One-line summary of the lookup state
pub fn status_text(state: &LookupState) -> String {
    match state {
        LookupState::Idle => UiText::IDLE_HINT.to_string(),
        LookupState::Loading { query } => format!("{} {}", UiText::LOADING, query),
        LookupState::Success(record) => match &record.postcode {
            Some(postcode) => format!("{} {}", UiText::FOUND, postcode),
            None => UiText::FOUND.to_string(),
        },
        other => other.error_message().unwrap_or_default().to_string(),
    }
}

pub fn render_status(f: &mut Frame, area: Rect, state: &LookupState) {
    let status = Paragraph::new(Line::from(Span::styled(
        status_text(state),
        Theme::status_style(state),
    )))
    .alignment(Alignment::Center);
    f.render_widget(status, area);
}
