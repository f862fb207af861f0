//! Review step: read-only summary plus the final submission.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::SubmitError;
use crate::guard::RouteGuard;
use crate::navigation::{NavigationOutcome, Navigator};
use crate::store::FormStore;
use crate::submission::{Submission, SubmissionReceipt, Submitter};
use crate::wizard::display::ReviewSummary;
use crate::wizard::{Route, StepId};

use super::Mount;

/// Submission lifecycle of the review page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewStatus {
    Ready,
    Submitting,
    Submitted(SubmissionReceipt),
}

pub struct ReviewController {
    store: Arc<FormStore>,
    navigator: Arc<dyn Navigator>,
    submitter: Arc<dyn Submitter>,
    status: RwLock<ReviewStatus>,
}

impl ReviewController {
    pub const GUARD: RouteGuard =
        RouteGuard::require_step_completed(StepId::Preferences, Route::Preferences);

    /// Mount the step. Redirects to preferences when that step is not completed.
    pub async fn mount(
        store: Arc<FormStore>,
        navigator: Arc<dyn Navigator>,
        submitter: Arc<dyn Submitter>,
    ) -> Mount<Self> {
        if let Some(outcome) = Self::GUARD.enforce(&store, navigator.as_ref()).await {
            return Mount::Redirected(outcome);
        }
        Mount::Ready(Self {
            store,
            navigator,
            submitter,
            status: RwLock::new(ReviewStatus::Ready),
        })
    }

    /// Summary rows, or `None` when either data section is missing.
    pub async fn summary(&self) -> Option<ReviewSummary> {
        let state = self.store.snapshot().await;
        match (&state.personal_info, &state.preferences) {
            (Some(info), Some(prefs)) => Some(ReviewSummary::new(info, prefs)),
            _ => None,
        }
    }

    pub async fn status(&self) -> ReviewStatus {
        self.status.read().await.clone()
    }

    pub async fn is_submitting(&self) -> bool {
        matches!(*self.status.read().await, ReviewStatus::Submitting)
    }

    pub async fn is_submitted(&self) -> bool {
        matches!(*self.status.read().await, ReviewStatus::Submitted(_))
    }

    /// Whether the submit control is enabled.
    pub async fn can_submit(&self) -> bool {
        matches!(*self.status.read().await, ReviewStatus::Ready)
    }

    /// Submit the completed form.
    ///
    /// Only one submission may be in flight; a second call while the first
    /// is pending fails with [`SubmitError::InFlight`]. On failure the page
    /// returns to ready so the user can try again.
    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmitError> {
        {
            let mut status = self.status.write().await;
            match *status {
                ReviewStatus::Submitting => return Err(SubmitError::InFlight),
                ReviewStatus::Submitted(_) => return Err(SubmitError::AlreadySubmitted),
                ReviewStatus::Ready => {}
            }
            *status = ReviewStatus::Submitting;
        }

        let state = self.store.snapshot().await;
        let submission = match (state.personal_info, state.preferences) {
            (Some(personal_info), Some(preferences)) => Submission {
                personal_info,
                preferences,
            },
            (info, _) => {
                *self.status.write().await = ReviewStatus::Ready;
                let missing = if info.is_none() {
                    StepId::PersonalInfo
                } else {
                    StepId::Preferences
                };
                return Err(SubmitError::Incomplete(format!("{missing} data is missing")));
            }
        };

        info!(email = %submission.personal_info.email, "Submitting form");
        match self.submitter.submit(&submission).await {
            Ok(receipt) => {
                if let Err(e) = self.store.set_step_completed(StepId::Review).await {
                    warn!(error = %e, "Could not mark review completed");
                }
                info!(id = %receipt.id, "Form submitted");
                *self.status.write().await = ReviewStatus::Submitted(receipt.clone());
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "Form submission failed");
                *self.status.write().await = ReviewStatus::Ready;
                Err(e)
            }
        }
    }

    /// Clear all form data and return to the landing page.
    pub async fn start_over(&self) -> NavigationOutcome {
        self.store.reset().await;
        *self.status.write().await = ReviewStatus::Ready;
        self.navigator.navigate(Route::Home).await
    }

    /// Return to the preferences step. Data and flags are kept.
    ///
    /// Only available before submission starts; returns `None` while a
    /// submission is in flight or once it has succeeded.
    pub async fn back(&self) -> Option<NavigationOutcome> {
        if !self.can_submit().await {
            return None;
        }
        Some(self.navigator.navigate(Route::Preferences).await)
    }
}
