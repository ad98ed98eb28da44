//! Commit controller driven by the host's primary action button.
//!
//! `Idle -> Submitting -> Closed` on success, `Submitting -> Failed` on any
//! API error. `Failed` accepts a new trigger; `Closed` is terminal. There are
//! no automatic retries.

use std::future::Future;

use serde_json::{Map, Value};

use crate::{
    api::ApiError,
    edit::{EditSchema, StagedEdit},
    host::{Host, MainButton},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitState {
    Idle,
    Submitting,
    Closed,
    /// Last attempt failed with this message; a new attempt is allowed.
    Failed(String),
}

/// What to do when the button is pressed with nothing staged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyCommit {
    /// Close the session without a request.
    Close,
    /// Keep the button disabled until something changes.
    Disallow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// Nothing was staged; closed without a request.
    ClosedUnchanged,
    Failed(String),
    /// Already submitting, already closed, or nothing to send.
    Ignored,
}

#[derive(Debug)]
pub struct CommitController {
    label: String,
    on_empty: EmptyCommit,
    state: CommitState,
}

impl CommitController {
    pub fn new(label: impl Into<String>, on_empty: EmptyCommit) -> Self {
        Self {
            label: label.into(),
            on_empty,
            state: CommitState::Idle,
        }
    }

    pub fn state(&self) -> &CommitState {
        &self.state
    }

    /// Button state for the current commit state and staged changes.
    pub fn main_button(&self, dirty: bool) -> MainButton {
        match self.state {
            CommitState::Closed => MainButton::hidden(),
            CommitState::Submitting => MainButton::labelled(&self.label)
                .enabled(false)
                .in_progress(true),
            CommitState::Idle | CommitState::Failed(_) => MainButton::labelled(&self.label)
                .enabled(dirty || self.on_empty == EmptyCommit::Close),
        }
    }

    fn can_start(&self) -> bool {
        matches!(self.state, CommitState::Idle | CommitState::Failed(_))
    }

    /// Closes the session without a staged entity behind the button.
    pub fn dismiss(&mut self, host: &dyn Host) -> CommitOutcome {
        if !self.can_start() {
            return CommitOutcome::Ignored;
        }
        self.state = CommitState::Closed;
        host.set_main_button(&self.main_button(false));
        host.close();
        CommitOutcome::ClosedUnchanged
    }

    /// Sends the diff of `edit` through `submit`.
    ///
    /// On success the overlay is folded into the snapshot and the session
    /// closes. On failure the message is shown and `edit` is left as it was.
    pub async fn trigger<S, F, Fut>(
        &mut self,
        edit: &mut StagedEdit<S>,
        host: &dyn Host,
        submit: F,
    ) -> CommitOutcome
    where
        S: EditSchema,
        F: FnOnce(Map<String, Value>) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        if !self.can_start() {
            tracing::debug!("commit ignored in state {:?}", self.state);
            return CommitOutcome::Ignored;
        }

        let diff = edit.diff();
        if diff.is_empty() {
            return match self.on_empty {
                EmptyCommit::Close => self.dismiss(host),
                EmptyCommit::Disallow => CommitOutcome::Ignored,
            };
        }

        tracing::info!(
            "committing {} change(s) to {}",
            diff.len(),
            S::ENTITY
        );
        self.state = CommitState::Submitting;
        host.set_main_button(&self.main_button(true));

        match submit(diff).await {
            Ok(()) => {
                edit.commit_succeeded();
                self.state = CommitState::Closed;
                host.set_main_button(&self.main_button(false));
                host.close();
                CommitOutcome::Committed
            }
            Err(err) => {
                let message = format!("Error: {}", err.user_message());
                tracing::warn!("commit to {} failed: {err}", S::ENTITY);
                self.state = CommitState::Failed(message.clone());
                host.set_main_button(&self.main_button(edit.is_dirty()));
                host.show_alert(&message);
                CommitOutcome::Failed(message)
            }
        }
    }
}
