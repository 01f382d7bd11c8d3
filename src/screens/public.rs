use serde::Serialize;

use super::{ScreenOutcome, View};
use crate::{models::Identity, policy, routes::Route};

/// HomeView
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    pub title: &'static str,
    pub login: Route,
}

/// LoginView
///
/// An empty login form. The form itself lives in `forms::LoginForm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginView {
    pub title: &'static str,
}

/// UnauthorizedView
///
/// "Access denied" page with a way back to the viewer's own dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnauthorizedView {
    pub title: &'static str,
    pub message: &'static str,
    pub dashboard: Option<Route>,
    pub home: Route,
}

pub(crate) fn home() -> ScreenOutcome {
    ScreenOutcome::Ready(View::Home(HomeView {
        title: "Bienvenue !",
        login: Route::Login,
    }))
}

/// Someone already signed in has nothing to do here and goes to their dashboard.
pub(crate) fn login(identity: Option<&Identity>) -> ScreenOutcome {
    match identity {
        Some(identity) => ScreenOutcome::Redirect(policy::landing_route_for(identity)),
        None => ScreenOutcome::Ready(View::Login(LoginView { title: "Connexion" })),
    }
}

pub(crate) fn unauthorized(identity: Option<&Identity>) -> ScreenOutcome {
    // An unknown role lands here too; its "dashboard" would loop back.
    let dashboard = identity
        .map(policy::landing_route_for)
        .filter(|route| *route != Route::Unauthorized);

    ScreenOutcome::Ready(View::Unauthorized(UnauthorizedView {
        title: "Accès Refusé",
        message: "Vous n'avez pas les permissions nécessaires pour accéder à cette page.",
        dashboard,
        home: Route::Home,
    }))
}
