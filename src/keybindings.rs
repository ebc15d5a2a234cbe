//! Keybinding registry for the search form
//!
//! Maps key events to [`KeyAction`]s and supplies the text for the nav bar
//! and the help overlay. Keys that map to no action are text editing and
//! go to the input box.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum KeyAction {
    #[strum(serialize = "Search")]
    Submit,
    #[strum(serialize = "Clear input")]
    ClearInput,
    #[strum(serialize = "Clear result")]
    Reset,
    #[strum(serialize = "Help")]
    Help,
    #[strum(serialize = "Quit")]
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    /// Key name shown to the user
    pub display: &'static str,
}

impl Keybinding {
    pub const fn new(key: KeyCode, action: KeyAction, display: &'static str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display,
        }
    }

    pub const fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &'static str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display,
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        if self.key != event.code {
            return false;
        }
        // Shift is implied by the character itself
        let mods = event.modifiers.difference(KeyModifiers::SHIFT);
        mods == self.modifiers
    }
}

/// Keybinding registry
pub struct KeybindingContext {
    bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    pub fn new() -> Self {
        Self {
            bindings: vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Submit, "Enter"),
                Keybinding::with_modifiers(
                    KeyCode::Char('u'),
                    KeyModifiers::CONTROL,
                    KeyAction::ClearInput,
                    "Ctrl+U",
                ),
                Keybinding::with_modifiers(
                    KeyCode::Char('l'),
                    KeyModifiers::CONTROL,
                    KeyAction::Reset,
                    "Ctrl+L",
                ),
                Keybinding::new(KeyCode::F(1), KeyAction::Help, "F1"),
                Keybinding::new(KeyCode::Esc, KeyAction::Quit, "Esc"),
                Keybinding::with_modifiers(
                    KeyCode::Char('c'),
                    KeyModifiers::CONTROL,
                    KeyAction::Quit,
                    "Ctrl+C",
                ),
            ],
        }
    }

    /// Action bound to `event`, if any
    pub fn action_for(&self, event: &KeyEvent) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }

    /// First key bound to `action`
    pub fn key_for(&self, action: KeyAction) -> Option<&'static str> {
        self.bindings
            .iter()
            .find(|b| b.action == action)
            .map(|b| b.display)
    }

    /// `(key, description)` pairs for the nav bar, one per action
    pub fn nav_hints(&self) -> Vec<(&'static str, String)> {
        KeyAction::iter()
            .filter_map(|action| self.key_for(action).map(|key| (key, action.to_string())))
            .collect()
    }

    /// Every binding, for the help overlay
    pub fn all(&self) -> &[Keybinding] {
        &self.bindings
    }
}
