//! User interface rendering module
//!
//! - `form` - Title, postcode input and status line
//! - `results` - Result panel for a settled lookup
//! - `help` - Nav bar and help overlay

mod form;
mod help;
mod results;

use crate::app::AppState;
use crate::keybindings::KeybindingContext;
use crate::theme::{Styles, UiConstants};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Block,
    Frame,
};

/// Stateless renderer for the search form
#[derive(Debug, Default)]
pub struct UiRenderer;

impl UiRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the whole screen
    pub fn render(&self, f: &mut Frame, state: &AppState, keybindings: &KeybindingContext) {
        let area = f.area();
        f.render_widget(Block::default().style(Styles::panel_bg()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(UiConstants::TITLE_HEIGHT),
                Constraint::Length(UiConstants::INPUT_HEIGHT),
                Constraint::Length(UiConstants::STATUS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(UiConstants::NAV_BAR_HEIGHT),
            ])
            .split(area);

        form::render_title(f, chunks[0]);
        form::render_input(f, chunks[1], state);
        form::render_status(f, chunks[2], state.session.state());
        results::render_results(f, chunks[3], state.session.state());
        help::render_nav_bar(f, chunks[4], keybindings);

        if state.help_visible {
            help::render_help_overlay(f, area, keybindings);
        }
    }
}

/// Rectangle of `percent_x` by `percent_y` centred in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupRecord;
    use crate::postcode::{LookupResult, PostcodeQuery};
    use crate::resolver::LookupError;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(state: &AppState) -> String {
        let mut terminal = match Terminal::new(TestBackend::new(100, 30)) {
            Ok(t) => t,
            Err(e) => panic!("test terminal: {e}"),
        };
        let keybindings = KeybindingContext::new();
        let renderer = UiRenderer::new();
        if let Err(e) = terminal.draw(|f| renderer.render(f, state, &keybindings)) {
            panic!("draw failed: {e}");
        }
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn settled(outcome: Result<LookupRecord, LookupError>) -> AppState {
        let mut state = AppState::new();
        let Some(ticket) = state.session.submit("SW1A 1AA") else {
            panic!("submission should be accepted");
        };
        if let Err(e) = state.session.settle(ticket.seq, outcome) {
            panic!("settle failed: {e}");
        }
        state
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 60, outer);
        assert!(inner.x >= outer.x && inner.right() <= outer.right());
        assert!(inner.y >= outer.y && inner.bottom() <= outer.bottom());
        assert_eq!(inner.width, 60);
    }

    #[test]
    fn test_idle_screen_shows_hint() {
        let screen = draw(&AppState::new());
        assert!(screen.contains("NGR Finder"));
        assert!(screen.contains("press Enter to search"));
    }

    #[test]
    fn test_success_screen_shows_grid_reference() {
        let record = LookupRecord::from_result(
            LookupResult {
                postcode: Some("SW1A 1AA".to_string()),
                eastings: Some(529_090.0),
                northings: Some(179_645.0),
                latitude: Some(51.501_009),
                longitude: Some(-0.141_588),
                ..Default::default()
            },
            10,
        );
        let screen = draw(&settled(Ok(record)));
        assert!(screen.contains("TQ 29090 79645"));
        assert!(screen.contains("51.501009"));
        assert!(screen.contains("openstreetmap.org"));
    }

    #[test]
    fn test_error_screen_shows_message() {
        let screen = draw(&settled(Err(LookupError::NotFound {
            postcode: "SW1A1AA".to_string(),
            message: "Invalid postcode".to_string(),
        })));
        assert!(screen.contains("Postcode not found"));
        assert!(!screen.contains("Easting"));
    }

    #[test]
    fn test_loading_screen_shows_query() {
        let mut state = AppState::new();
        let Some(query) = PostcodeQuery::parse("m1 1ae") else {
            panic!("query should parse");
        };
        state.session.submit(query.as_str());
        let screen = draw(&state);
        assert!(screen.contains("M11AE"));
    }

    #[test]
    fn test_help_overlay() {
        let mut state = AppState::new();
        state.help_visible = true;
        let screen = draw(&state);
        assert!(screen.contains("Ctrl+U"));
        assert!(screen.contains("Press F1 or Esc to close"));
    }
}
