//! Preferences step: guarded by the personal-info step.

use std::sync::Arc;

use tracing::info;

use crate::guard::RouteGuard;
use crate::navigation::{NavigationOutcome, Navigator};
use crate::store::FormStore;
use crate::wizard::display::shows_student_options;
use crate::wizard::{Occupation, PreferencesDraft, Route, StepId, ValidationErrors};

use super::Mount;

/// Extra toggles shown to students. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentOptions {
    pub discounts: bool,
    pub educational_resources: bool,
}

/// What the preferences page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesView {
    pub draft: PreferencesDraft,
    /// Occupation from the personal-info step, for the "As a …" banner.
    pub occupation: Option<Occupation>,
    pub show_student_options: bool,
    pub student_options: StudentOptions,
}

pub struct PreferencesController {
    store: Arc<FormStore>,
    navigator: Arc<dyn Navigator>,
    draft: PreferencesDraft,
    student_options: StudentOptions,
    errors: Option<ValidationErrors>,
}

impl PreferencesController {
    pub const GUARD: RouteGuard =
        RouteGuard::require_step_completed(StepId::PersonalInfo, Route::PersonalInfo);

    /// Mount the step. Redirects to personal info when that step is not
    /// completed; otherwise pre-fills the draft from stored preferences.
    pub async fn mount(store: Arc<FormStore>, navigator: Arc<dyn Navigator>) -> Mount<Self> {
        if let Some(outcome) = Self::GUARD.enforce(&store, navigator.as_ref()).await {
            return Mount::Redirected(outcome);
        }
        let draft = store
            .preferences()
            .await
            .map(|prefs| PreferencesDraft::from(&prefs))
            .unwrap_or_default();
        Mount::Ready(Self {
            store,
            navigator,
            draft,
            student_options: StudentOptions::default(),
            errors: None,
        })
    }

    /// Current view, derived from the draft and the stored personal info.
    pub async fn view(&self) -> PreferencesView {
        let state = self.store.snapshot().await;
        PreferencesView {
            draft: self.draft.clone(),
            occupation: state.personal_info.as_ref().map(|p| p.occupation),
            show_student_options: shows_student_options(&state),
            student_options: self.student_options,
        }
    }

    pub fn draft(&self) -> &PreferencesDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PreferencesDraft {
        &mut self.draft
    }

    /// Toggle an interest checkbox. Returns whether it is now selected.
    pub fn toggle_interest(&mut self, interest: &str) -> bool {
        self.draft.toggle_interest(interest)
    }

    /// Edit one field. Returns false for unknown fields.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        self.draft.set_field(field, value)
    }

    pub fn student_options_mut(&mut self) -> &mut StudentOptions {
        &mut self.student_options
    }

    /// Errors from the last failed submit.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    /// Validate, commit, and advance to the review step.
    pub async fn submit(&mut self) -> Result<NavigationOutcome, ValidationErrors> {
        let prefs = match self.draft.validate() {
            Ok(prefs) => prefs,
            Err(errors) => {
                self.errors = Some(errors.clone());
                return Err(errors);
            }
        };
        self.errors = None;

        info!(
            interests = prefs.interests.len(),
            notifications = %prefs.notification_preference,
            "Preferences step completed"
        );
        self.store.complete_preferences(prefs).await;
        Ok(self
            .navigator
            .navigate(StepId::Preferences.next_route())
            .await)
    }

    /// Return to the personal-info step. Data and flags are kept.
    pub async fn back(&self) -> NavigationOutcome {
        self.navigator.navigate(Route::PersonalInfo).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Router;
    use crate::store::MemoryStore;
    use crate::wizard::validation::fields;
    use crate::wizard::{
        Interest, NotificationPreference, PersonalInfo, Preferences, ThemePreference,
    };

    fn info(occupation: Occupation) -> PersonalInfo {
        PersonalInfo {
            full_name: "Al".to_string(),
            email: "a@b.com".to_string(),
            occupation,
        }
    }

    async fn setup(occupation: Option<Occupation>) -> (Arc<FormStore>, Arc<Router>) {
        let store = FormStore::load(Arc::new(MemoryStore::new())).await;
        if let Some(occ) = occupation {
            store.complete_personal_info(info(occ)).await;
        }
        let router = Router::new(store.clone());
        (store, router)
    }

    #[tokio::test]
    async fn mount_redirects_without_personal_info() {
        let (store, router) = setup(None).await;
        let mount = PreferencesController::mount(store, router.clone()).await;
        assert!(mount.is_redirected());
        assert_eq!(router.current().await, Route::PersonalInfo);
    }

    #[test]
    fn guard_matches_step_sequence() {
        assert_eq!(
            Some(PreferencesController::GUARD),
            RouteGuard::for_step(StepId::Preferences)
        );
    }

    #[tokio::test]
    async fn student_sees_student_options() {
        let (store, router) = setup(Some(Occupation::Student)).await;
        let ctrl = PreferencesController::mount(store, router).await.ready().unwrap();
        let view = ctrl.view().await;
        assert!(view.show_student_options);
        assert_eq!(view.occupation, Some(Occupation::Student));
    }

    #[tokio::test]
    async fn non_student_does_not_see_student_options() {
        let (store, router) = setup(Some(Occupation::Developer)).await;
        let ctrl = PreferencesController::mount(store, router).await.ready().unwrap();
        assert!(!ctrl.view().await.show_student_options);
    }

    #[tokio::test]
    async fn defaults_when_nothing_stored() {
        let (store, router) = setup(Some(Occupation::Other)).await;
        let ctrl = PreferencesController::mount(store, router).await.ready().unwrap();
        assert!(ctrl.draft().interests.is_empty());
        assert_eq!(ctrl.draft().notification_preference, "email");
        assert_eq!(ctrl.draft().theme_preference, "system");
    }

    #[tokio::test]
    async fn prefills_stored_preferences() {
        let (store, router) = setup(Some(Occupation::Other)).await;
        store
            .complete_preferences(Preferences {
                interests: vec![Interest::Marketing],
                notification_preference: NotificationPreference::None,
                theme_preference: ThemePreference::Dark,
            })
            .await;
        let ctrl = PreferencesController::mount(store, router).await.ready().unwrap();
        assert_eq!(ctrl.draft().interests, vec!["marketing".to_string()]);
        assert_eq!(ctrl.draft().notification_preference, "none");
        assert_eq!(ctrl.draft().theme_preference, "dark");
    }

    #[tokio::test]
    async fn empty_interests_block_submit() {
        let (store, router) = setup(Some(Occupation::Student)).await;
        router.navigate(Route::Preferences).await;
        let mut ctrl = PreferencesController::mount(store.clone(), router.clone())
            .await
            .ready()
            .unwrap();

        let errors = ctrl.submit().await.unwrap_err();
        assert_eq!(
            errors.message(fields::INTERESTS),
            Some("Please select at least one interest.")
        );
        assert!(store.preferences().await.is_none());
        assert!(!store.completed_steps().await.preferences);
        assert_eq!(router.current().await, Route::Preferences);
    }

    #[tokio::test]
    async fn valid_submit_advances_to_review() {
        let (store, router) = setup(Some(Occupation::Student)).await;
        let mut ctrl = PreferencesController::mount(store.clone(), router.clone())
            .await
            .ready()
            .unwrap();
        ctrl.toggle_interest("technology");
        ctrl.toggle_interest("design");
        ctrl.set_field("notificationPreference", "none");
        ctrl.student_options_mut().discounts = true;

        let outcome = ctrl.submit().await.unwrap();
        assert_eq!(outcome, NavigationOutcome::Rendered(Route::Review));

        let stored = store.preferences().await.unwrap();
        assert_eq!(stored.interests, vec![Interest::Technology, Interest::Design]);
        assert_eq!(stored.notification_preference, NotificationPreference::None);
        assert_eq!(stored.theme_preference, ThemePreference::System);
        let flags = store.completed_steps().await;
        assert!(flags.personal_info && flags.preferences && !flags.review);
    }

    #[tokio::test]
    async fn back_keeps_data_and_flags() {
        let (store, router) = setup(Some(Occupation::Manager)).await;
        let ctrl = PreferencesController::mount(store.clone(), router.clone())
            .await
            .ready()
            .unwrap();
        let outcome = ctrl.back().await;
        assert_eq!(outcome, NavigationOutcome::Rendered(Route::PersonalInfo));
        assert!(store.completed_steps().await.personal_info);
        assert!(store.personal_info().await.is_some());
    }
}
