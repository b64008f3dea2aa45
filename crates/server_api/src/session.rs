use std::sync::Arc;

use repo_sync::{PushOutcome, SyncClient, SyncError, DEFAULT_COMMIT_MESSAGE};
use serde::Serialize;
use shared::{
    domain::RatingTable,
    error::{ApiError, ErrorCode},
    protocol::{Notice, RatingForm},
};
use storage::{RatingStore, StoreError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::validator::{validate, ValidationError};

pub const SUCCESS_MESSAGE: &str = "Ratings added and pushed to GitHub successfully!";
pub const EMPTY_SUBMISSION_MESSAGE: &str = "Nothing to add: every field was empty.";
pub const LOCAL_ONLY_MESSAGE: &str = "Ratings saved locally; syncing is disabled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loaded,
    Validated,
    Persisted,
    Synced,
    Rendered,
}

/// Failures that abort a submission before anything reaches the remote.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation(err) => err.user_message(),
            SessionError::Store(err) => format!("Could not access the ratings file: {err}"),
        }
    }
}

impl From<&SessionError> for ApiError {
    fn from(value: &SessionError) -> Self {
        match value {
            SessionError::Validation(err) => err.into(),
            SessionError::Store(_) => ApiError::new(ErrorCode::Internal, value.user_message()),
        }
    }
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The input was rejected or the file could not be read or written.
    Aborted(SessionError),
    /// Every field was empty; nothing was written.
    Unchanged,
    /// The batch was saved locally. `sync` says whether it also reached the remote.
    Saved {
        appended: usize,
        sync: Result<PushOutcome, SyncError>,
    },
}

/// Everything the presenter needs after one submission.
#[derive(Debug)]
pub struct SessionReport {
    pub table: RatingTable,
    pub outcome: SubmissionOutcome,
    pub notices: Vec<Notice>,
    /// States visited in order, ending in `Rendered` or `Idle`.
    pub trace: Vec<SessionState>,
}

impl SessionReport {
    pub fn state(&self) -> SessionState {
        self.trace.last().copied().unwrap_or(SessionState::Idle)
    }

    pub fn error(&self) -> Option<&SessionError> {
        match &self.outcome {
            SubmissionOutcome::Aborted(err) => Some(err),
            _ => None,
        }
    }

    pub fn sync_error(&self) -> Option<&SyncError> {
        match &self.outcome {
            SubmissionOutcome::Saved { sync: Err(err), .. } => Some(err),
            _ => None,
        }
    }

    pub fn appended(&self) -> usize {
        match &self.outcome {
            SubmissionOutcome::Saved { appended, .. } => *appended,
            _ => 0,
        }
    }
}

struct Trace(Vec<SessionState>);

impl Trace {
    fn start() -> Self {
        Self(vec![SessionState::Idle])
    }

    fn enter(&mut self, state: SessionState) {
        debug!(from = ?self.0.last(), to = ?state, "session transition");
        self.0.push(state);
    }
}

/// Runs load, validate, append, save and push for each submitted form.
///
/// Holds no table state between calls; every submission starts from whatever
/// the store returns. Concurrent callers are not coordinated here.
#[derive(Clone)]
pub struct SessionController {
    store: Arc<dyn RatingStore>,
    sync: Arc<dyn SyncClient>,
    commit_message: String,
}

impl SessionController {
    pub fn new(store: Arc<dyn RatingStore>, sync: Arc<dyn SyncClient>) -> Self {
        Self {
            store,
            sync,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    /// Current table for display. Does not pull.
    pub async fn current_table(&self) -> Result<RatingTable, StoreError> {
        self.store.load().await
    }

    pub async fn submit(&self, form: &RatingForm) -> SessionReport {
        let mut trace = Trace::start();
        let mut notices = Vec::new();

        if let Err(err) = self.sync.pull().await {
            warn!(error = %err, "pull failed; continuing with local ratings");
            notices.push(Notice::warning(format!(
                "Could not pull the latest ratings, showing local data: {err}"
            )));
        }

        let loaded = match self.store.load().await {
            Ok(table) => table,
            Err(err) => {
                error!(error = %err, "failed to load ratings");
                return abort(RatingTable::new(), err.into(), notices, trace);
            }
        };
        trace.enter(SessionState::Loaded);

        let batch = match validate(form) {
            Ok(batch) => batch,
            Err(err) => {
                info!(error = %err, "rejected rating submission");
                return abort(loaded, err.into(), notices, trace);
            }
        };
        trace.enter(SessionState::Validated);

        if batch.is_empty() {
            notices.push(Notice::info(EMPTY_SUBMISSION_MESSAGE));
            trace.enter(SessionState::Rendered);
            return SessionReport {
                table: loaded,
                outcome: SubmissionOutcome::Unchanged,
                notices,
                trace: trace.0,
            };
        }

        let appended = batch.len();
        let mut table = loaded.clone();
        table.append(batch);
        if let Err(err) = self.store.save(&table).await {
            error!(error = %err, "failed to save ratings");
            return abort(loaded, err.into(), notices, trace);
        }
        trace.enter(SessionState::Persisted);
        info!(appended, rows = table.len(), "appended ratings");

        // The local save stands whether or not the push works.
        let sync = self
            .sync
            .commit_and_push(self.store.artifact_path(), &self.commit_message)
            .await;
        match &sync {
            Ok(PushOutcome::Pushed) => {
                trace.enter(SessionState::Synced);
                notices.push(Notice::success(SUCCESS_MESSAGE));
            }
            Ok(PushOutcome::Skipped) => {
                notices.push(Notice::info(LOCAL_ONLY_MESSAGE));
            }
            Err(err) => {
                warn!(error = %err, "push failed; ratings kept locally");
                notices.push(Notice::warning(format!(
                    "Ratings saved locally, but pushing to the remote failed: {err}"
                )));
            }
        }
        trace.enter(SessionState::Rendered);

        SessionReport {
            table,
            outcome: SubmissionOutcome::Saved { appended, sync },
            notices,
            trace: trace.0,
        }
    }
}

fn abort(
    table: RatingTable,
    err: SessionError,
    mut notices: Vec<Notice>,
    mut trace: Trace,
) -> SessionReport {
    notices.push(Notice::error(err.user_message()));
    trace.enter(SessionState::Idle);
    SessionReport {
        table,
        outcome: SubmissionOutcome::Aborted(err),
        notices,
        trace: trace.0,
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
