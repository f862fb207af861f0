//! Error types for the form wizard.

use crate::wizard::steps::StepId;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Durable key-value storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to open storage: {0}")]
    Open(String),

    #[error("Read failed for key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Write failed for key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Form store precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Cannot mark step {step} completed: its data is missing")]
    MissingStepData { step: StepId },
}

/// Review submission errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("A submission is already in flight")]
    InFlight,

    #[error("The form has already been submitted")]
    AlreadySubmitted,

    #[error("Nothing to submit: {0}")]
    Incomplete(String),

    #[error("Submission failed: {0}")]
    Failed(String),
}
