//! Lookup orchestration and the state a front end renders from.
//!
//! [`Viewer`] turns a raw identifier into a [`FetchOutcome`]. [`ViewState`]
//! holds what is currently on screen. Every fetch takes a [`Ticket`] from
//! the state before it starts, and only the most recently issued ticket may
//! write its result back, so overlapping fetches always settle on the
//! newest request regardless of the order responses arrive in.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::client::RecordSource;
use crate::error::{Error, Result};
use crate::id::{IdPolicy, PatientId};
use crate::normalize::{NormalizeOptions, Normalized, normalize};

/// A fetch that made it all the way to display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub patient_id: PatientId,
    pub status: u16,
    pub normalized: Normalized,
}

impl FetchOutcome {
    pub fn status_line(&self) -> String {
        format!("Success! Status: {}", self.status)
    }
}

pub struct Viewer<S> {
    source: S,
    id_policy: IdPolicy,
    options: NormalizeOptions,
}

impl<S: RecordSource> Viewer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            id_policy: IdPolicy::default(),
            options: NormalizeOptions::default(),
        }
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Validate, fetch and normalize one patient profile.
    pub async fn fetch(&self, raw_id: &str) -> Result<FetchOutcome> {
        let patient_id = PatientId::parse(raw_id, self.id_policy)?;
        let fetched = self.source.fetch(&patient_id).await?;
        let normalized = normalize(&fetched.body, &self.options)?;

        if normalized.discarded_records > 0 {
            tracing::warn!(
                patient_id = %patient_id,
                discarded = normalized.discarded_records,
                "Response held more than one record, showing the first"
            );
        }

        Ok(FetchOutcome {
            patient_id,
            status: fetched.status,
            normalized,
        })
    }

    /// [`Viewer::fetch`] bracketed by [`ViewState::begin`] and
    /// [`ViewState::complete`]. The lock is never held across the request.
    pub async fn fetch_into(&self, state: &Mutex<ViewState>, raw_id: &str) -> Applied {
        let ticket = lock(state).begin();
        let result = self.fetch(raw_id).await;
        lock(state).complete(ticket, result)
    }
}

fn lock(state: &Mutex<ViewState>) -> std::sync::MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handed out by [`ViewState::begin`]; ordered by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Whether a completed fetch reached the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// A newer fetch or a clear happened in the meantime.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub success: bool,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ViewState {
    issued: u64,
    loading: bool,
    status: Option<StatusLine>,
    content: Option<FetchOutcome>,
    error: Option<Error>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.loading = true;
        Ticket(self.issued)
    }

    /// Replace the display with `result` if `ticket` is the newest one.
    pub fn complete(&mut self, ticket: Ticket, result: Result<FetchOutcome>) -> Applied {
        if ticket.0 != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Dropping response from superseded fetch"
            );
            return Applied::Stale;
        }

        self.loading = false;
        match result {
            Ok(outcome) => {
                self.status = Some(StatusLine {
                    success: true,
                    text: outcome.status_line(),
                });
                self.content = Some(outcome);
                self.error = None;
            }
            Err(error) => {
                self.status = Some(StatusLine {
                    success: false,
                    text: error.status_line(),
                });
                self.content = None;
                self.error = Some(error);
            }
        }
        Applied::Applied
    }

    /// Empty the display. Fetches still in flight become stale.
    pub fn clear(&mut self) {
        self.issued += 1;
        self.loading = false;
        self.status = None;
        self.content = None;
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn content(&self) -> Option<&FetchOutcome> {
        self.content.as_ref()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}
