/// Router Module Index
///
/// Client-side navigation: the static route table, the per-navigation guard
/// state machine, and the role-dependent navigation menu.
///
/// Authorization is split in two stages. The guard applies the coarse role
/// gate from `policy::is_allowed` using only the route family; screens apply
/// the ownership gate once the subject parameter is known.
use serde::{Serialize, Serializer};
use std::{borrow::Cow, fmt};

use crate::policy::RouteFamily;

/// Static route descriptors (path pattern, required family, target screen).
pub mod table;

/// The navigation guard state machine.
pub mod guard;

/// Menu entries derived from the current identity.
pub mod menu;

pub use guard::{GuardDecision, guard};
pub use table::{RouteDescriptor, ScreenKind};

/// Route
///
/// A resolved front-end location. Parameterised variants carry the raw path
/// segments (subject identifiers and meal timestamps) verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Unauthorized,
    Admin { id: String },
    Dietitians,
    Dietitian { id: String },
    Nurses,
    Nurse { id: String },
    Patients,
    Patient { id: String },
    Meal { patient_id: String, date: String },
    Consumables,
    NotFound { path: String },
}

impl Route {
    /// parse
    ///
    /// Resolves a path against the route table. Query strings and fragments
    /// are ignored, as is a trailing slash. Each segment is percent-decoded
    /// before matching, so captured parameters hold the plain value (a meal
    /// date arrives as `12:30:00+02:00`, not `12%3A30%3A00%2B02%3A00`).
    /// Anything unmatched becomes `Route::NotFound`.
    pub fn parse(path: &str) -> Route {
        let clean = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        let decoded: Vec<Cow<'_, str>> = clean
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_segment)
            .collect();
        let segments: Vec<&str> = decoded.iter().map(|s| s.as_ref()).collect();

        match table::resolve(&segments) {
            Some((descriptor, params)) => Route::from_match(descriptor.screen, params),
            None => Route::NotFound {
                path: path.to_string(),
            },
        }
    }

    fn from_match(screen: ScreenKind, mut params: Vec<String>) -> Route {
        // The table guarantees the parameter count for each screen.
        let mut take = || params.remove(0);
        match screen {
            ScreenKind::Home => Route::Home,
            ScreenKind::Login => Route::Login,
            ScreenKind::Unauthorized => Route::Unauthorized,
            ScreenKind::AdminProfile => Route::Admin { id: take() },
            ScreenKind::DietitianList => Route::Dietitians,
            ScreenKind::DietitianDetail => Route::Dietitian { id: take() },
            ScreenKind::NurseList => Route::Nurses,
            ScreenKind::NurseDetail => Route::Nurse { id: take() },
            ScreenKind::PatientList => Route::Patients,
            ScreenKind::PatientDetail => Route::Patient { id: take() },
            ScreenKind::MealDetail => {
                let patient_id = take();
                let date = take();
                Route::Meal { patient_id, date }
            }
            ScreenKind::Catalog => Route::Consumables,
            ScreenKind::NotFound => Route::NotFound {
                path: String::new(),
            },
        }
    }

    pub fn screen(&self) -> ScreenKind {
        match self {
            Route::Home => ScreenKind::Home,
            Route::Login => ScreenKind::Login,
            Route::Unauthorized => ScreenKind::Unauthorized,
            Route::Admin { .. } => ScreenKind::AdminProfile,
            Route::Dietitians => ScreenKind::DietitianList,
            Route::Dietitian { .. } => ScreenKind::DietitianDetail,
            Route::Nurses => ScreenKind::NurseList,
            Route::Nurse { .. } => ScreenKind::NurseDetail,
            Route::Patients => ScreenKind::PatientList,
            Route::Patient { .. } => ScreenKind::PatientDetail,
            Route::Meal { .. } => ScreenKind::MealDetail,
            Route::Consumables => ScreenKind::Catalog,
            Route::NotFound { .. } => ScreenKind::NotFound,
        }
    }

    /// The access-matrix row guarding this route, or `None` for public routes.
    pub fn family(&self) -> Option<RouteFamily> {
        table::descriptor_for(self.screen()).and_then(|descriptor| descriptor.family)
    }

    pub fn is_public(&self) -> bool {
        self.family().is_none()
    }

    /// The canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Unauthorized => "/unauthorized".to_string(),
            Route::Admin { id } => format!("/admin/{id}"),
            Route::Dietitians => "/dieteticiens".to_string(),
            Route::Dietitian { id } => format!("/dieteticiens/{id}"),
            Route::Nurses => "/infirmiers".to_string(),
            Route::Nurse { id } => format!("/infirmiers/{id}"),
            Route::Patients => "/patients".to_string(),
            Route::Patient { id } => format!("/patients/{id}"),
            Route::Meal { patient_id, date } => format!("/patients/{patient_id}/repas/{date}"),
            Route::Consumables => "/consommables".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }
}

/// Malformed escapes (invalid UTF-8) leave the segment as typed.
fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
