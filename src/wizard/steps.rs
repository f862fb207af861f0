//! Step sequence: the single place step order and routes are declared.

use serde::{Deserialize, Serialize};

use super::model::CompletedSteps;

/// Identifier of a wizard step.
///
/// Progresses linearly: PersonalInfo → Preferences → Review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepId {
    PersonalInfo,
    Preferences,
    Review,
}

/// A page the router knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page.
    Home,
    PersonalInfo,
    Preferences,
    Review,
}

/// One entry of the step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDef {
    pub id: StepId,
    pub route: Route,
    pub label: &'static str,
}

/// Canonical step order.
pub const STEPS: [StepDef; 3] = [
    StepDef {
        id: StepId::PersonalInfo,
        route: Route::PersonalInfo,
        label: "Personal Info",
    },
    StepDef {
        id: StepId::Preferences,
        route: Route::Preferences,
        label: "Preferences",
    },
    StepDef {
        id: StepId::Review,
        route: Route::Review,
        label: "Review",
    },
];

impl StepId {
    /// Position of this step in [`STEPS`].
    pub fn index(&self) -> usize {
        STEPS
            .iter()
            .position(|s| s.id == *self)
            .unwrap_or_default()
    }

    /// The sequence entry for this step.
    pub fn def(&self) -> &'static StepDef {
        &STEPS[self.index()]
    }

    pub fn route(&self) -> Route {
        self.def().route
    }

    pub fn label(&self) -> &'static str {
        self.def().label
    }

    /// Get the next step in the sequence, if any.
    pub fn next(&self) -> Option<StepId> {
        STEPS.get(self.index() + 1).map(|s| s.id)
    }

    /// Get the previous step in the sequence, if any.
    pub fn prev(&self) -> Option<StepId> {
        self.index().checked_sub(1).map(|i| STEPS[i].id)
    }

    /// Route a successful submit of this step advances to.
    ///
    /// The last step has no successor page; it stays on its own route.
    pub fn next_route(&self) -> Route {
        self.next().map(|s| s.route()).unwrap_or_else(|| self.route())
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PersonalInfo => "personalInfo",
            Self::Preferences => "preferences",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::PersonalInfo => "/steps/personal-info",
            Self::Preferences => "/steps/preferences",
            Self::Review => "/steps/review",
        }
    }

    /// Resolve a path to a route. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        [Self::Home, Self::PersonalInfo, Self::Preferences, Self::Review]
            .into_iter()
            .find(|r| r.path() == normalized)
    }

    /// The step rendered at this route, if it is a step page.
    pub fn step(&self) -> Option<StepId> {
        STEPS.iter().find(|s| s.route == *self).map(|s| s.id)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// One position of the progress indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressItem {
    /// 1-based step number.
    pub number: usize,
    pub step: StepId,
    pub label: &'static str,
    pub active: bool,
    pub completed: bool,
    /// Whether the connector leading into this step is filled (the previous
    /// step is completed). Always false for the first step.
    pub connector_filled: bool,
}

/// Derive the progress indicator for the active route.
pub fn progress(active: Route, completed: &CompletedSteps) -> Vec<ProgressItem> {
    STEPS
        .iter()
        .enumerate()
        .map(|(i, def)| ProgressItem {
            number: i + 1,
            step: def.id,
            label: def.label,
            active: def.route == active,
            completed: completed.is_completed(def.id),
            connector_filled: def.id.prev().is_some_and(|p| completed.is_completed(p)),
        })
        .collect()
}
