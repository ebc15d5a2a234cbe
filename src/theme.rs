//! Centralized theme and styling for the TUI
//!
//! Single source of truth for the colors and styles used by the search form.
//!
//! # Usage
//! ```rust
//! use ngr_finder::theme::{Colors, Styles, Theme};
//! use ngr_finder::lookup_state::LookupState;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! let status_style = Theme::status_style(&LookupState::Offline);
//! ```

use crate::lookup_state::LookupState;
use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors
    // -------------------------------------------------------------------------

    /// Panel background
    pub const BG_PRIMARY: Color = Color::Rgb(16, 24, 20);

    /// Help overlay background
    pub const BG_SECONDARY: Color = Color::Rgb(24, 36, 30);

    pub const FG_PRIMARY: Color = Color::White;

    pub const FG_SECONDARY: Color = Color::Gray;

    pub const FG_MUTED: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Accent Colors
    // -------------------------------------------------------------------------

    /// Ordnance green, used for borders and titles
    pub const PRIMARY: Color = Color::Rgb(22, 163, 74);

    /// Grid reference highlight
    pub const SECONDARY: Color = Color::Rgb(250, 204, 21);

    /// Map links
    pub const LINK: Color = Color::Rgb(96, 165, 250);

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    pub const SUCCESS: Color = Color::Green;

    pub const WARNING: Color = Color::Yellow;

    pub const ERROR: Color = Color::Red;

    pub const INFO: Color = Color::Cyan;

    // -------------------------------------------------------------------------
    // UI Element Colors
    // -------------------------------------------------------------------------

    /// Border of the focused input box
    pub const BORDER_ACTIVE: Color = Color::Rgb(22, 163, 74);

    /// Border of the input box while a lookup is running
    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Result field labels
    pub const LABEL: Color = Color::Gray;

    /// Navigation hint color
    pub const NAV_HINT: Color = Color::DarkGray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Main title style (green, bold)
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Result field label
    pub fn label() -> Style {
        Style::default().fg(Colors::LABEL)
    }

    /// Result field value
    pub fn value() -> Style {
        Style::default()
            .fg(Colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// The formatted grid reference
    pub fn grid_ref() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn link() -> Style {
        Style::default()
            .fg(Colors::LINK)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    pub fn panel_bg_alt() -> Style {
        Style::default().bg(Colors::BG_SECONDARY)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Colors::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    /// Navigation hint (keybindings)
    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }

    /// Key name inside a navigation hint
    pub fn nav_key() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }
}

// =============================================================================
// THEME CONTEXT
// =============================================================================

/// Semantic style lookups
pub struct Theme;

impl Theme {
    /// Style for the status line under the input box
    pub fn status_style(state: &LookupState) -> Style {
        match state {
            LookupState::Idle => Styles::text_muted(),
            LookupState::Loading { .. } => Style::default().fg(Colors::INFO),
            LookupState::Success(record) if !record.is_converted() => Styles::warning(),
            LookupState::Success(_) => Style::default().fg(Colors::SUCCESS),
            LookupState::NotFound { .. } | LookupState::ConnectionError { .. } => Styles::error(),
            LookupState::Offline => Styles::warning(),
        }
    }

    /// Border style of the input box
    pub fn input_border(state: &LookupState) -> Style {
        if state.is_loading() {
            Styles::border_inactive()
        } else {
            Styles::border_active()
        }
    }
}

// =============================================================================
// UI CONSTANTS
// =============================================================================

/// UI dimension and layout constants
pub struct UiConstants;

impl UiConstants {
    /// Title block height
    pub const TITLE_HEIGHT: u16 = 3;

    /// Input box height (one line plus borders)
    pub const INPUT_HEIGHT: u16 = 3;

    /// Status line height
    pub const STATUS_HEIGHT: u16 = 1;

    pub const NAV_BAR_HEIGHT: u16 = 1;

    /// Help overlay size as a percentage of the screen
    pub const HELP_WIDTH_PCT: u16 = 60;
    pub const HELP_HEIGHT_PCT: u16 = 60;

    /// Width of the result field label column
    pub const LABEL_WIDTH: u16 = 18;
}

// =============================================================================
// TEXT CONSTANTS
// =============================================================================

/// Common UI text strings
pub struct UiText;

impl UiText {
    pub const APP_TITLE: &'static str = "NGR Finder";
    pub const SUBTITLE: &'static str = "UK postcode to Ordnance Survey National Grid Reference";
    pub const INPUT_TITLE: &'static str = " Postcode ";
    pub const INPUT_PLACEHOLDER: &'static str = "e.g. SW1A 1AA";
    pub const IDLE_HINT: &'static str = "Type a postcode and press Enter to search";
    pub const LOADING: &'static str = "Searching...";
    pub const FOUND: &'static str = "Found";
    pub const HELP_TITLE: &'static str = " Help ";
    pub const HELP_CLOSE: &'static str = "Press F1 or Esc to close";
}
