//! Wizard domain: step sequence, form model, pure transitions, validation,
//! and display derivations.
//!
//! Nothing in this module performs I/O. The form store applies transitions
//! and persists them; step controllers own drafts and call into the store.

pub mod display;
pub mod model;
pub mod state;
pub mod steps;
pub mod validation;

pub use model::{
    CompletedSteps, FormState, Interest, NotificationPreference, Occupation, PersonalInfo,
    Preferences, ThemePreference,
};
pub use state::FormAction;
pub use steps::{ProgressItem, Route, STEPS, StepDef, StepId, progress};
pub use validation::{
    FieldError, FieldErrorKind, PersonalInfoDraft, PreferencesDraft, ValidationErrors,
};
