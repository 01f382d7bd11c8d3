use serde::Serialize;

use crate::policy::RouteFamily;

/// ScreenKind
///
/// The target screen a route descriptor renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScreenKind {
    Home,
    Login,
    Unauthorized,
    AdminProfile,
    DietitianList,
    DietitianDetail,
    NurseList,
    NurseDetail,
    PatientList,
    PatientDetail,
    MealDetail,
    Catalog,
    NotFound,
}

/// RouteDescriptor
///
/// One row of the static route table. `family` is `None` for public routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub pattern: &'static str,
    pub family: Option<RouteFamily>,
    pub screen: ScreenKind,
}

const fn public(pattern: &'static str, screen: ScreenKind) -> RouteDescriptor {
    RouteDescriptor {
        pattern,
        family: None,
        screen,
    }
}

const fn gated(pattern: &'static str, family: RouteFamily, screen: ScreenKind) -> RouteDescriptor {
    RouteDescriptor {
        pattern,
        family: Some(family),
        screen,
    }
}

/// ROUTES
///
/// The complete front-end route surface. The catch-all 404 is not listed:
/// anything that matches no pattern resolves to `ScreenKind::NotFound`.
pub static ROUTES: &[RouteDescriptor] = &[
    // --- Public ---
    public("/", ScreenKind::Home),
    public("/login", ScreenKind::Login),
    public("/unauthorized", ScreenKind::Unauthorized),
    // --- Gated ---
    gated("/admin/:id", RouteFamily::AdminProfile, ScreenKind::AdminProfile),
    gated("/dieteticiens", RouteFamily::Dietitians, ScreenKind::DietitianList),
    gated("/dieteticiens/:id", RouteFamily::Dietitians, ScreenKind::DietitianDetail),
    gated("/infirmiers", RouteFamily::Nurses, ScreenKind::NurseList),
    gated("/infirmiers/:id", RouteFamily::Nurses, ScreenKind::NurseDetail),
    gated("/patients", RouteFamily::PatientList, ScreenKind::PatientList),
    gated("/patients/:id", RouteFamily::PatientDetail, ScreenKind::PatientDetail),
    gated(
        "/patients/:id/repas/:date",
        RouteFamily::MealDetail,
        ScreenKind::MealDetail,
    ),
    gated("/consommables", RouteFamily::Catalog, ScreenKind::Catalog),
];

/// Finds the first descriptor whose pattern matches `segments`, returning it
/// with the captured `:param` values in pattern order.
pub(crate) fn resolve(segments: &[&str]) -> Option<(&'static RouteDescriptor, Vec<String>)> {
    ROUTES.iter().find_map(|descriptor| {
        let pattern: Vec<&str> = descriptor
            .pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (expected, actual) in pattern.iter().zip(segments) {
            if expected.starts_with(':') {
                params.push((*actual).to_string());
            } else if expected != actual {
                return None;
            }
        }
        Some((descriptor, params))
    })
}

pub fn descriptor_for(screen: ScreenKind) -> Option<&'static RouteDescriptor> {
    ROUTES.iter().find(|descriptor| descriptor.screen == screen)
}
