//! Application module
//!
//! Owns the search form state and drives lookups.
//!
//! # Module Structure
//! - `state` - Application state ([`AppState`])
//! - Main module - App struct and event loop
//!
//! Each submission runs on its own worker thread, which sends a
//! [`LookupMessage`] back over a channel. The loop drains the channel every
//! tick and settles the session; results for superseded submissions are
//! dropped.

mod state;

pub use state::AppState;

use crate::error::Result;
use crate::keybindings::{KeyAction, KeybindingContext};
use crate::lookup::{self, LookupRecord};
use crate::lookup_state::{LookupState, LookupTransitionError};
use crate::resolver::{LookupError, PostcodeLookup};
use crate::ui::UiRenderer;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Event poll interval for the main loop
pub const TICK: Duration = Duration::from_millis(50);

/// Sent from a lookup worker to the UI thread
#[derive(Debug)]
pub struct LookupMessage {
    /// Submission the outcome belongs to
    pub seq: u64,
    pub outcome: std::result::Result<LookupRecord, LookupError>,
}

/// Main application struct
pub struct App {
    state: AppState,
    resolver: Arc<dyn PostcodeLookup>,
    grid_digits: u8,
    keybindings: KeybindingContext,
    ui_renderer: UiRenderer,
    lookup_tx: Sender<LookupMessage>,
    lookup_rx: Receiver<LookupMessage>,
}

impl App {
    /// Create a new application instance
    pub fn new(resolver: Arc<dyn PostcodeLookup>, grid_digits: u8) -> Self {
        info!("Creating new App instance");
        let (lookup_tx, lookup_rx) = mpsc::channel();

        Self {
            state: AppState::new(),
            resolver,
            grid_digits,
            keybindings: KeybindingContext::new(),
            ui_renderer: UiRenderer::new(),
            lookup_tx,
            lookup_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Shortcut for the lookup state
    pub fn lookup_state(&self) -> &LookupState {
        self.state.session.state()
    }

    pub fn toggle_help(&mut self) {
        self.state.help_visible = !self.state.help_visible;
    }

    /// Submit the current input.
    ///
    /// Blank input is ignored. Otherwise the previous outcome is cleared and
    /// a worker is started for the new query. Returns true if a lookup
    /// started.
    pub fn submit(&mut self) -> bool {
        let Some(submission) = self.state.session.submit(self.state.input.value()) else {
            debug!("Ignoring blank submission");
            return false;
        };

        let resolver = Arc::clone(&self.resolver);
        let tx = self.lookup_tx.clone();
        let digits = self.grid_digits;
        let seq = submission.seq;
        let query = submission.query;

        let spawned = thread::Builder::new()
            .name(format!("lookup-{seq}"))
            .spawn(move || {
                let outcome = lookup::lookup(resolver.as_ref(), query.as_str(), digits);
                // The receiver is gone only when the app is shutting down
                let _ = tx.send(LookupMessage { seq, outcome });
            });

        if let Err(e) = spawned {
            warn!("Failed to start lookup worker: {}", e);
            self.apply(LookupMessage {
                seq,
                outcome: Err(LookupError::ConnectionFailed(e.to_string())),
            });
        }
        true
    }

    /// Settle the session with a worker's outcome
    fn apply(&mut self, msg: LookupMessage) {
        match self.state.session.settle(msg.seq, msg.outcome) {
            Ok(state) => debug!("Session now {}", state),
            Err(e @ LookupTransitionError::StaleSubmission { .. }) => debug!("{}", e),
            Err(e) => warn!("{}", e),
        }
    }

    /// Drain pending worker messages without blocking. Returns how many were
    /// processed.
    pub fn poll_lookup_messages(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.lookup_rx.try_recv() {
            self.apply(msg);
            processed += 1;
        }
        processed
    }

    /// Block until the current lookup settles or `timeout` elapses.
    /// Returns true if the session is no longer loading.
    pub fn wait_for_settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.lookup_state().is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.lookup_rx.recv_timeout(remaining) {
                Ok(msg) => self.apply(msg),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        !self.lookup_state().is_loading()
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            self.poll_lookup_messages();

            terminal.draw(|f| {
                self.ui_renderer.render(f, &self.state, &self.keybindings);
            })?;

            if crossterm::event::poll(TICK)? {
                if let Event::Key(key_event) = crossterm::event::read()? {
                    if self.handle_key_event(key_event) {
                        break;
                    }
                }
            }
        }

        info!("Main loop finished");
        Ok(())
    }

    /// Handle a key press. Returns true if the app should exit.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        // Windows reports releases too
        if key_event.kind == KeyEventKind::Release {
            return false;
        }

        let action = self.keybindings.action_for(&key_event);

        if self.state.help_visible {
            match action {
                Some(KeyAction::Help) | Some(KeyAction::Quit) => self.toggle_help(),
                _ => {}
            }
            return false;
        }

        match action {
            Some(KeyAction::Submit) => {
                self.submit();
            }
            Some(KeyAction::ClearInput) => self.state.input.clear(),
            Some(KeyAction::Reset) => {
                self.state.input.clear();
                self.state.session.reset();
            }
            Some(KeyAction::Help) => self.toggle_help(),
            Some(KeyAction::Quit) => {
                info!("Quit requested");
                return true;
            }
            None => {
                self.state.input.handle_key(key_event);
            }
        }
        false
    }
}
