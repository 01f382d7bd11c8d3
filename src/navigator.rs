use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    AppState,
    error::{ApiError, FormError},
    forms::LoginForm,
    policy,
    routes::{self, GuardDecision, Route},
    screens::{self, ScreenOutcome, View, ViewOptions},
};

/// Upper bound on guard/screen redirects followed by one navigation. The
/// route graph has no cycles today; the bound keeps a future one from
/// spinning forever.
pub const MAX_REDIRECTS: usize = 4;

/// Page
///
/// What one navigation ends up showing. `route` is the location after all
/// redirects were followed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    /// Session restore has not settled yet.
    Placeholder { route: Route },
    Rendered { route: Route, view: View },
    /// The screen could not load its data; `message` is shown inline.
    Failed { route: Route, message: String },
    /// A newer navigation started while this one was loading; its result
    /// was dropped.
    Superseded,
}

impl Page {
    pub fn route(&self) -> Option<&Route> {
        match self {
            Page::Placeholder { route } | Page::Rendered { route, .. } | Page::Failed { route, .. } => Some(route),
            Page::Superseded => None,
        }
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            Page::Rendered { view, .. } => Some(view),
            _ => None,
        }
    }
}

/// Navigator
///
/// Drives navigation attempts against the shared `AppState`: resolve the
/// path, run the guard, follow redirects, load the screen.
///
/// Every call to `navigate` takes a ticket. A load that finishes after a
/// newer navigation has started returns `Page::Superseded`, so a slow
/// response never overwrites the page the user moved on to.
pub struct Navigator {
    state: AppState,
    epoch: AtomicU64,
}

impl Navigator {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            epoch: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// navigate
    ///
    /// Navigates to `path` with default view options.
    pub async fn navigate(&self, path: &str) -> Page {
        self.navigate_with(path, ViewOptions::default()).await
    }

    pub async fn navigate_with(&self, path: &str, options: ViewOptions) -> Page {
        self.go(Route::parse(path), options).await
    }

    /// go
    ///
    /// Navigates to an already resolved route.
    pub async fn go(&self, route: Route, options: ViewOptions) -> Page {
        let ticket = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let requested = route.clone();
        let mut route = route;

        for _ in 0..=MAX_REDIRECTS {
            let session = self.state.session.snapshot();

            let target = match routes::guard(&session, &route) {
                GuardDecision::Placeholder => return Page::Placeholder { route },
                GuardDecision::Redirect(next) => {
                    tracing::debug!(from = %route, to = %next, "guard redirect");
                    route = next;
                    continue;
                }
                GuardDecision::Render(target) => target,
            };

            let outcome = screens::load(&target, session.identity(), &self.state.gateways, options).await;

            if !self.is_current(ticket) {
                tracing::debug!(route = %target, ticket, "discarding superseded navigation");
                return Page::Superseded;
            }

            match outcome {
                ScreenOutcome::Ready(view) => {
                    tracing::info!(route = %target, "navigated");
                    return Page::Rendered { route: target, view };
                }
                ScreenOutcome::Failed(message) => return Page::Failed { route: target, message },
                ScreenOutcome::Redirect(next) => {
                    tracing::debug!(from = %target, to = %next, "screen redirect");
                    route = next;
                }
            }
        }

        tracing::error!(requested = %requested, last = %route, "too many redirects");
        Page::Failed {
            route,
            message: "Trop de redirections.".to_string(),
        }
    }

    /// sign_in
    ///
    /// Submits the login form and, on success, lands on the identity's
    /// dashboard.
    pub async fn sign_in(&self, form: &LoginForm) -> Result<Page, FormError> {
        let identity = form.submit(&self.state.session).await?;
        let landing = policy::landing_route_for(&identity);
        Ok(self.go(landing, ViewOptions::default()).await)
    }

    /// logout
    ///
    /// Ends the session and returns to the home page. The navigation happens
    /// even when the backend notification failed; that failure is handed
    /// back next to the page so the caller can show it.
    pub async fn logout(&self) -> (Page, Result<(), ApiError>) {
        let notified = self.state.session.logout().await;
        let page = self.go(Route::Home, ViewOptions::default()).await;
        (page, notified)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == ticket
    }
}
