//! Lookup State Machine
//!
//! Explicit, owned state for one search form. The presentation layer holds a
//! [`LookupSession`] and changes it only through discrete events; rendering
//! reads [`LookupSession::state`].
//!
//! # State Flow
//!
//! ```text
//! Idle
//!   ↓ submit
//! Loading ──settle──→ Success | NotFound | ConnectionError | Offline
//!   ↑                                  │
//!   └──────── submit (clears) ─────────┘
//! ```
//!
//! # Invariants
//!
//! - `Loading` is entered synchronously on submit and left exactly once,
//!   by the settle carrying the submission's sequence number
//! - A newer submission supersedes an in-flight one; the older settle is
//!   rejected as stale and leaves the state untouched
//! - A new submission discards any prior result and error

use crate::lookup::LookupRecord;
use crate::postcode::PostcodeQuery;
use crate::resolver::LookupError;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Observable state of the search form
#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    /// Nothing submitted yet, or reset
    Idle,
    /// A lookup is in flight
    Loading { query: PostcodeQuery },
    /// Lookup succeeded (conversion may still have degraded)
    Success(Box<LookupRecord>),
    /// The service has no such postcode
    NotFound { query: PostcodeQuery },
    /// Transport failure
    ConnectionError { reason: String },
    /// Transport failure while the device is offline
    Offline,
}

impl LookupState {
    /// Short label for status lines and logs
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading { .. } => "Loading",
            Self::Success(_) => "Success",
            Self::NotFound { .. } => "Not found",
            Self::ConnectionError { .. } => "Connection error",
            Self::Offline => "Offline",
        }
    }

    #[inline]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Returns true for the four outcomes a lookup can settle in
    #[inline]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Idle | Self::Loading { .. })
    }

    /// The current result, if the last lookup succeeded
    pub fn record(&self) -> Option<&LookupRecord> {
        match self {
            Self::Success(record) => Some(record.as_ref()),
            _ => None,
        }
    }

    /// Message to show the user, if the state is an error
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Postcode not found"),
            Self::ConnectionError { .. } => Some("Connection error"),
            Self::Offline => Some(LookupError::Offline.user_message()),
            _ => None,
        }
    }
}

impl fmt::Display for LookupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Errors from feeding an event the session cannot accept
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupTransitionError {
    /// A settle arrived but no lookup is in flight
    #[error("No lookup in progress (state is {state})")]
    NotLoading { state: &'static str },

    /// A settle arrived for a submission that has been superseded
    #[error("Stale lookup result #{seq} ignored (current submission is #{current})")]
    StaleSubmission { seq: u64, current: u64 },
}

/// Ticket for an accepted submission; the worker carries it back to
/// [`LookupSession::settle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub seq: u64,
    pub query: PostcodeQuery,
}

/// Owner of the search form's state
#[derive(Debug, Clone)]
pub struct LookupSession {
    state: LookupState,
    /// Sequence number of the latest accepted submission (0 = none yet)
    current_seq: u64,
}

impl Default for LookupSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupSession {
    pub fn new() -> Self {
        Self {
            state: LookupState::Idle,
            current_seq: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Sequence number of the latest accepted submission
    #[inline]
    pub fn current_seq(&self) -> u64 {
        self.current_seq
    }

    /// Submit raw form input.
    ///
    /// Blank input is ignored (returns `None`, state unchanged, no request
    /// should be made). Otherwise the previous outcome is cleared, the state
    /// becomes `Loading` and the returned ticket must be passed to
    /// [`settle`](Self::settle) once the lookup finishes.
    pub fn submit(&mut self, raw: &str) -> Option<Submission> {
        let query = PostcodeQuery::parse(raw)?;

        if self.state.is_loading() {
            debug!("Superseding in-flight lookup #{}", self.current_seq);
        }

        self.reset();
        self.current_seq += 1;
        self.state = LookupState::Loading {
            query: query.clone(),
        };
        info!("Lookup #{} started for {}", self.current_seq, query);

        Some(Submission {
            seq: self.current_seq,
            query,
        })
    }

    /// Record the outcome of submission `seq`.
    ///
    /// # Errors
    ///
    /// - `NotLoading` if nothing is in flight
    /// - `StaleSubmission` if `seq` is not the latest submission
    pub fn settle(
        &mut self,
        seq: u64,
        outcome: Result<LookupRecord, LookupError>,
    ) -> Result<&LookupState, LookupTransitionError> {
        let LookupState::Loading { query } = &self.state else {
            return Err(LookupTransitionError::NotLoading {
                state: self.state.label(),
            });
        };
        if seq != self.current_seq {
            return Err(LookupTransitionError::StaleSubmission {
                seq,
                current: self.current_seq,
            });
        }

        let next = match outcome {
            Ok(record) => LookupState::Success(Box::new(record)),
            Err(LookupError::NotFound { .. }) => LookupState::NotFound {
                query: query.clone(),
            },
            Err(LookupError::Offline) => LookupState::Offline,
            Err(LookupError::ConnectionFailed(reason)) => LookupState::ConnectionError { reason },
            // The session never hands out a ticket for blank input, but a
            // resolver may still report it
            Err(LookupError::EmptyQuery) => LookupState::Idle,
        };

        info!("Lookup #{} settled: {}", seq, next);
        self.state = next;
        Ok(&self.state)
    }

    /// Drop any result or error and return to `Idle`.
    ///
    /// An in-flight lookup is abandoned: its settle will be rejected.
    pub fn reset(&mut self) {
        self.state = LookupState::Idle;
    }
}
