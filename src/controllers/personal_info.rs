//! Personal-info step: the unguarded entry step.

use std::sync::Arc;

use tracing::info;

use crate::navigation::{NavigationOutcome, Navigator};
use crate::store::FormStore;
use crate::wizard::{PersonalInfoDraft, StepId, ValidationErrors};

pub struct PersonalInfoController {
    store: Arc<FormStore>,
    navigator: Arc<dyn Navigator>,
    draft: PersonalInfoDraft,
    errors: Option<ValidationErrors>,
}

impl PersonalInfoController {
    /// Mount the step, pre-filling the draft from stored personal info.
    pub async fn mount(store: Arc<FormStore>, navigator: Arc<dyn Navigator>) -> Self {
        let draft = store
            .personal_info()
            .await
            .map(|info| PersonalInfoDraft::from(&info))
            .unwrap_or_default();
        Self {
            store,
            navigator,
            draft,
            errors: None,
        }
    }

    pub fn draft(&self) -> &PersonalInfoDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PersonalInfoDraft {
        &mut self.draft
    }

    /// Edit one field. Returns false for unknown fields.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        self.draft.set_field(field, value)
    }

    /// Errors from the last failed submit.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    /// Validate, commit, and advance to the preferences step.
    ///
    /// On validation failure nothing is stored and no navigation happens.
    pub async fn submit(&mut self) -> Result<NavigationOutcome, ValidationErrors> {
        let info = match self.draft.validate() {
            Ok(info) => info,
            Err(errors) => {
                self.errors = Some(errors.clone());
                return Err(errors);
            }
        };
        self.errors = None;

        info!(occupation = %info.occupation, "Personal info step completed");
        self.store.complete_personal_info(info).await;
        Ok(self
            .navigator
            .navigate(StepId::PersonalInfo.next_route())
            .await)
    }
}
