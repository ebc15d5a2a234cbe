//! Application state definitions

use crate::input::PostcodeInput;
use crate::lookup_state::LookupSession;

/// Everything the renderer reads
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Postcode text field
    pub input: PostcodeInput,
    /// Lookup lifecycle and current outcome
    pub session: LookupSession,
    /// Whether help overlay is visible
    pub help_visible: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
