//! Wizard state machine: pure transitions over [`FormState`].
//!
//! Transitions return a new state and never touch storage; the form store
//! persists whatever `apply` accepts.

use crate::error::StoreError;

use super::model::{FormState, PersonalInfo, Preferences};
use super::steps::{Route, StepId};

/// A mutation request against the wizard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Replace the personal info wholesale.
    SetPersonalInfo(PersonalInfo),
    /// Replace the preferences wholesale.
    SetPreferences(Preferences),
    /// Set one completion flag. Requires the step's data to be present.
    MarkCompleted(StepId),
    /// Store personal info and mark its step completed in one transition.
    CommitPersonalInfo(PersonalInfo),
    /// Store preferences and mark its step completed in one transition.
    CommitPreferences(Preferences),
    /// Drop all data and flags.
    Reset,
}

impl FormAction {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPersonalInfo(_) => "set_personal_info",
            Self::SetPreferences(_) => "set_preferences",
            Self::MarkCompleted(_) => "mark_completed",
            Self::CommitPersonalInfo(_) => "commit_personal_info",
            Self::CommitPreferences(_) => "commit_preferences",
            Self::Reset => "reset",
        }
    }
}

impl FormState {
    /// Apply `action`, returning the next state.
    pub fn apply(&self, action: FormAction) -> Result<FormState, StoreError> {
        match action {
            FormAction::SetPersonalInfo(data) => Ok(FormState {
                personal_info: Some(data),
                ..self.clone()
            }),
            FormAction::SetPreferences(data) => Ok(FormState {
                preferences: Some(data),
                ..self.clone()
            }),
            FormAction::MarkCompleted(step) => {
                if !self.has_data_for(step) {
                    return Err(StoreError::MissingStepData { step });
                }
                Ok(FormState {
                    completed_steps: self.completed_steps.with_completed(step),
                    ..self.clone()
                })
            }
            FormAction::CommitPersonalInfo(data) => Ok(FormState {
                personal_info: Some(data),
                completed_steps: self.completed_steps.with_completed(StepId::PersonalInfo),
                ..self.clone()
            }),
            FormAction::CommitPreferences(data) => Ok(FormState {
                preferences: Some(data),
                completed_steps: self.completed_steps.with_completed(StepId::Preferences),
                ..self.clone()
            }),
            FormAction::Reset => Ok(FormState::default()),
        }
    }

    /// The step a returning user should continue with: the first step whose
    /// completion flag is unset, or the last step when all are set.
    pub fn resume_step(&self) -> StepId {
        [StepId::PersonalInfo, StepId::Preferences, StepId::Review]
            .into_iter()
            .find(|s| !self.completed_steps.is_completed(*s))
            .unwrap_or(StepId::Review)
    }

    /// Route for [`FormState::resume_step`].
    pub fn resume_route(&self) -> Route {
        self.resume_step().route()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::model::{
        CompletedSteps, Interest, NotificationPreference, Occupation, ThemePreference,
    };

    fn info() -> PersonalInfo {
        PersonalInfo {
            full_name: "Al".to_string(),
            email: "a@b.com".to_string(),
            occupation: Occupation::Student,
        }
    }

    fn prefs() -> Preferences {
        Preferences {
            interests: vec![Interest::Technology],
            notification_preference: NotificationPreference::Email,
            theme_preference: ThemePreference::System,
        }
    }

    fn full_state() -> FormState {
        FormState::default()
            .apply(FormAction::CommitPersonalInfo(info()))
            .unwrap()
            .apply(FormAction::CommitPreferences(prefs()))
            .unwrap()
    }

    #[test]
    fn set_personal_info_replaces_wholesale() {
        let state = FormState::default()
            .apply(FormAction::SetPersonalInfo(info()))
            .unwrap();
        assert_eq!(state.personal_info, Some(info()));
        assert!(!state.completed_steps.personal_info);

        let replacement = PersonalInfo {
            full_name: "Bea".to_string(),
            email: "bea@example.org".to_string(),
            occupation: Occupation::Manager,
        };
        let state = state
            .apply(FormAction::SetPersonalInfo(replacement.clone()))
            .unwrap();
        assert_eq!(state.personal_info, Some(replacement));
    }

    #[test]
    fn mark_completed_sets_only_target_flag() {
        let base = FormState {
            personal_info: Some(info()),
            preferences: Some(prefs()),
            completed_steps: CompletedSteps::default(),
        };
        for step in [StepId::PersonalInfo, StepId::Preferences, StepId::Review] {
            let next = base.apply(FormAction::MarkCompleted(step)).unwrap();
            for other in [StepId::PersonalInfo, StepId::Preferences, StepId::Review] {
                assert_eq!(next.completed_steps.is_completed(other), other == step);
            }
            assert_eq!(next.personal_info, base.personal_info);
            assert_eq!(next.preferences, base.preferences);
        }
    }

    #[test]
    fn mark_completed_preserves_prior_flags() {
        let state = full_state().apply(FormAction::MarkCompleted(StepId::Review)).unwrap();
        assert!(state.completed_steps.personal_info);
        assert!(state.completed_steps.preferences);
        assert!(state.completed_steps.review);
    }

    #[test]
    fn mark_completed_without_data_is_rejected() {
        let err = FormState::default()
            .apply(FormAction::MarkCompleted(StepId::Preferences))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::MissingStepData {
                step: StepId::Preferences
            }
        );

        let only_info = FormState::default()
            .apply(FormAction::CommitPersonalInfo(info()))
            .unwrap();
        assert!(only_info.apply(FormAction::MarkCompleted(StepId::Review)).is_err());
    }

    #[test]
    fn commit_sets_data_and_flag_together() {
        let state = full_state();
        assert_eq!(state.personal_info, Some(info()));
        assert_eq!(state.preferences, Some(prefs()));
        assert!(state.completed_steps.personal_info);
        assert!(state.completed_steps.preferences);
        assert!(!state.completed_steps.review);
    }

    #[test]
    fn reset_clears_everything_from_any_state() {
        let states = [
            FormState::default(),
            full_state(),
            full_state().apply(FormAction::MarkCompleted(StepId::Review)).unwrap(),
        ];
        for state in states {
            let reset = state.apply(FormAction::Reset).unwrap();
            assert_eq!(reset, FormState::default());
        }
    }

    #[test]
    fn apply_does_not_mutate_input() {
        let before = full_state();
        let _ = before.apply(FormAction::Reset).unwrap();
        assert_eq!(before, full_state());
    }

    #[test]
    fn resume_route_follows_first_incomplete_step() {
        assert_eq!(FormState::default().resume_route(), Route::PersonalInfo);
        let partial = FormState::default()
            .apply(FormAction::CommitPersonalInfo(info()))
            .unwrap();
        assert_eq!(partial.resume_route(), Route::Preferences);
        assert_eq!(full_state().resume_route(), Route::Review);
    }
}
