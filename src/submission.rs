//! Final submission: the seam between the review step and whatever
//! receives the completed form.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::SubmitError;
use crate::wizard::{PersonalInfo, Preferences};

/// The completed form handed to a submitter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub personal_info: PersonalInfo,
    pub preferences: Preferences,
}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

/// Receives completed forms.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, SubmitError>;
}

/// Stand-in for a remote call: waits a fixed time, then always succeeds.
pub struct SimulatedSubmitter {
    latency: Duration,
}

impl SimulatedSubmitter {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl Submitter for SimulatedSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, SubmitError> {
        tracing::debug!(
            email = %submission.personal_info.email,
            latency_ms = self.latency.as_millis() as u64,
            "Simulating form submission"
        );
        tokio::time::sleep(self.latency).await;
        Ok(SubmissionReceipt {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        })
    }
}
