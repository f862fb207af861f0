//! Route guard: redirect away from a step whose prerequisite is unmet.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::navigation::{NavigationOutcome, Navigator};
use crate::store::FormStore;
use crate::wizard::{CompletedSteps, Route, StepId};

/// Result of evaluating a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Requires one step to be completed before a view may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard {
    pub required_step: StepId,
    pub fallback: Route,
}

impl RouteGuard {
    pub const fn require_step_completed(required_step: StepId, fallback: Route) -> Self {
        Self {
            required_step,
            fallback,
        }
    }

    /// The guard protecting `step`: its predecessor must be completed, else
    /// the user is sent to the predecessor's page. The first step is
    /// unguarded.
    pub fn for_step(step: StepId) -> Option<RouteGuard> {
        step.prev()
            .map(|prev| Self::require_step_completed(prev, prev.route()))
    }

    /// The guard protecting `route`, if any.
    pub fn for_route(route: Route) -> Option<RouteGuard> {
        route.step().and_then(Self::for_step)
    }

    /// Evaluate against the current completion flags.
    pub fn check(&self, completed: &CompletedSteps) -> GuardDecision {
        if completed.is_completed(self.required_step) {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(self.fallback)
        }
    }

    /// Check against the store and navigate to the fallback on failure.
    ///
    /// Returns the navigation outcome of the redirect, or `None` when the
    /// guard passes.
    pub async fn enforce(
        &self,
        store: &FormStore,
        navigator: &dyn Navigator,
    ) -> Option<NavigationOutcome> {
        match self.check(&store.completed_steps().await) {
            GuardDecision::Allow => None,
            GuardDecision::Redirect(to) => {
                debug!(
                    required = %self.required_step,
                    fallback = %to,
                    "Guard redirect"
                );
                Some(navigator.navigate(to).await)
            }
        }
    }
}

/// Re-check the active route whenever the form state changes.
///
/// Runs until the store's broadcast channel closes.
pub fn spawn_guard_watch(navigator: Arc<dyn Navigator>, store: Arc<FormStore>) -> JoinHandle<()> {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "Guard watcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Form store channel closed, guard watcher exiting");
                    break;
                }
            }
            if let Some(outcome) = navigator.recheck().await {
                info!(?outcome, "Active route no longer reachable");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_follow_step_sequence() {
        assert_eq!(RouteGuard::for_step(StepId::PersonalInfo), None);
        assert_eq!(
            RouteGuard::for_step(StepId::Preferences),
            Some(RouteGuard::require_step_completed(
                StepId::PersonalInfo,
                Route::PersonalInfo
            ))
        );
        assert_eq!(
            RouteGuard::for_route(Route::Review),
            Some(RouteGuard::require_step_completed(
                StepId::Preferences,
                Route::Preferences
            ))
        );
        assert_eq!(RouteGuard::for_route(Route::Home), None);
    }

    #[test]
    fn check_redirects_to_predecessor_when_incomplete() {
        let flag_combos = [
            (false, false, false),
            (true, false, false),
            (false, true, false),
            (true, true, false),
            (true, true, true),
        ];
        for (personal_info, preferences, review) in flag_combos {
            let flags = CompletedSteps {
                personal_info,
                preferences,
                review,
            };
            for step in [StepId::Preferences, StepId::Review] {
                let guard = RouteGuard::for_step(step).unwrap();
                let prev = step.prev().unwrap();
                let decision = guard.check(&flags);
                if flags.is_completed(prev) {
                    assert_eq!(decision, GuardDecision::Allow);
                } else {
                    assert_eq!(decision, GuardDecision::Redirect(prev.route()));
                }
            }
        }
    }
}
