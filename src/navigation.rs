//! Navigation: the route table and the guarded router.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::guard::{GuardDecision, RouteGuard};
use crate::store::FormStore;
use crate::wizard::{CompletedSteps, Route, STEPS};

/// What happened when a route was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested route's view is active.
    Rendered(Route),
    /// A guard sent the user elsewhere. `hops` lists every redirect target in
    /// order; the last one is the active route.
    Redirected {
        requested: Route,
        hops: Vec<Route>,
    },
    /// The path matches no route. The active route is unchanged.
    NotFound(String),
}

impl NavigationOutcome {
    /// The route whose view ended up active, if navigation resolved.
    pub fn active(&self) -> Option<Route> {
        match self {
            Self::Rendered(route) => Some(*route),
            Self::Redirected { hops, .. } => hops.last().copied(),
            Self::NotFound(_) => None,
        }
    }
}

/// The navigation primitive controllers and guards call.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Make `route` active, applying its guard.
    async fn navigate(&self, route: Route) -> NavigationOutcome;

    /// The active route.
    async fn current(&self) -> Route;

    /// Re-evaluate the active route's guard, redirecting if it now fails.
    async fn recheck(&self) -> Option<NavigationOutcome>;
}

/// Guarded router over the wizard's route table.
pub struct Router {
    store: Arc<FormStore>,
    current: RwLock<Route>,
}

impl Router {
    /// Create a router positioned at the landing page.
    pub fn new(store: Arc<FormStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            current: RwLock::new(Route::Home),
        })
    }

    /// Navigate by path, e.g. `/steps/review`.
    pub async fn navigate_path(&self, path: &str) -> NavigationOutcome {
        match Route::from_path(path) {
            Some(route) => self.navigate(route).await,
            None => {
                debug!(path, "No route for path");
                NavigationOutcome::NotFound(path.to_string())
            }
        }
    }

    /// Follow guards from `requested` until a view may render.
    fn resolve(requested: Route, completed: &CompletedSteps) -> (Route, Vec<Route>) {
        let mut route = requested;
        let mut hops = Vec::new();
        // Each hop moves strictly backwards through the sequence.
        for _ in 0..STEPS.len() {
            let Some(guard) = RouteGuard::for_route(route) else {
                break;
            };
            match guard.check(completed) {
                GuardDecision::Allow => break,
                GuardDecision::Redirect(to) => {
                    hops.push(to);
                    route = to;
                }
            }
        }
        (route, hops)
    }

    /// Resolve and activate `requested` while holding the route lock.
    async fn activate(&self, current: &mut Route, requested: Route) -> NavigationOutcome {
        let completed = self.store.completed_steps().await;
        let (resolved, hops) = Self::resolve(requested, &completed);
        *current = resolved;

        if hops.is_empty() {
            debug!(route = %resolved, "Navigated");
            NavigationOutcome::Rendered(resolved)
        } else {
            debug!(requested = %requested, to = %resolved, "Navigation redirected by guard");
            NavigationOutcome::Redirected { requested, hops }
        }
    }
}

#[async_trait]
impl Navigator for Router {
    async fn navigate(&self, route: Route) -> NavigationOutcome {
        let mut current = self.current.write().await;
        self.activate(&mut current, route).await
    }

    async fn current(&self) -> Route {
        *self.current.read().await
    }

    async fn recheck(&self) -> Option<NavigationOutcome> {
        let mut current = self.current.write().await;
        let guard = RouteGuard::for_route(*current)?;
        match guard.check(&self.store.completed_steps().await) {
            GuardDecision::Allow => None,
            GuardDecision::Redirect(to) => {
                let requested = *current;
                let outcome = self.activate(&mut current, to).await;
                let mut hops = vec![to];
                if let NavigationOutcome::Redirected { hops: more, .. } = outcome {
                    hops.extend(more);
                }
                Some(NavigationOutcome::Redirected { requested, hops })
            }
        }
    }
}
