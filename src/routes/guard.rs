use serde::Serialize;

use super::Route;
use crate::{policy, session::SessionState};

/// GuardDecision
///
/// Terminal result of one pass through the guard. A `Redirect` starts a new
/// navigation which re-enters the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "route", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session restore still in flight: show a neutral placeholder, do not redirect.
    Placeholder,
    Redirect(Route),
    Render(Route),
}

/// guard
///
/// Decides what a navigation to `route` does given the current session state.
///
/// 1. `Unknown` (restore in flight) → `Placeholder`, for every route, so no
///    target renders and no premature redirect to `/login` happens.
/// 2. Public routes → `Render`.
/// 3. `Anonymous` → `Redirect(/login)`.
/// 4. Authenticated without the role gate → `Redirect(/unauthorized)`.
/// 5. Otherwise → `Render`.
pub fn guard(state: &SessionState, route: &Route) -> GuardDecision {
    let identity = match state {
        SessionState::Unknown => return GuardDecision::Placeholder,
        SessionState::Anonymous => None,
        SessionState::Authenticated(identity) => Some(identity),
    };

    let Some(family) = route.family() else {
        return GuardDecision::Render(route.clone());
    };

    match identity {
        None => GuardDecision::Redirect(Route::Login),
        Some(identity) if !policy::is_allowed(identity.role, family) => {
            tracing::debug!(
                route = %route,
                role = ?identity.role,
                "role gate denied navigation"
            );
            GuardDecision::Redirect(Route::Unauthorized)
        }
        Some(_) => GuardDecision::Render(route.clone()),
    }
}
