//! Step controllers: one per wizard page.
//!
//! A controller owns its page's draft, validates it on submit, commits the
//! result to the form store, and navigates to the next step. Guarded
//! controllers refuse to mount while their prerequisite is unmet.

pub mod personal_info;
pub mod preferences;
pub mod review;

pub use personal_info::PersonalInfoController;
pub use preferences::{PreferencesController, PreferencesView, StudentOptions};
pub use review::{ReviewController, ReviewStatus};

use crate::navigation::NavigationOutcome;

/// Result of mounting a controller.
#[derive(Debug)]
pub enum Mount<C> {
    /// The view may render.
    Ready(C),
    /// The guard redirected; the view must not render.
    Redirected(NavigationOutcome),
}

impl<C> Mount<C> {
    pub fn ready(self) -> Option<C> {
        match self {
            Self::Ready(c) => Some(c),
            Self::Redirected(_) => None,
        }
    }

    pub fn is_redirected(&self) -> bool {
        matches!(self, Self::Redirected(_))
    }
}
