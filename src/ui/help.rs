//! Nav bar and help overlay

use super::centered_rect;
use crate::keybindings::KeybindingContext;
use crate::theme::{Styles, UiConstants, UiText};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_nav_bar(f: &mut Frame, area: Rect, keybindings: &KeybindingContext) {
    let mut spans = Vec::new();
    for (i, (key, desc)) in keybindings.nav_hints().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Styles::nav_hint()));
        }
        spans.push(Span::styled(key, Styles::nav_key()));
        spans.push(Span::styled(format!(" {desc}"), Styles::nav_hint()));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

pub fn render_help_overlay(f: &mut Frame, area: Rect, keybindings: &KeybindingContext) {
    let popup = centered_rect(UiConstants::HELP_WIDTH_PCT, UiConstants::HELP_HEIGHT_PCT, area);

    let mut lines = vec![
        Line::from(Span::styled("Keys", Styles::title())),
        Line::default(),
    ];
    for binding in keybindings.all() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", binding.display), Styles::nav_key()),
            Span::styled(binding.action.to_string(), Styles::text()),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Grid references are OSGB36; latitude and longitude are WGS84.",
        Styles::text_muted(),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(UiText::HELP_CLOSE, Styles::text_muted())));

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::border_active())
                    .title(UiText::HELP_TITLE),
            )
            .style(Styles::panel_bg_alt())
            .wrap(Wrap { trim: false }),
        popup,
    );
}
