use serde::Serialize;

use super::Route;
use crate::{models::Identity, policy};

/// MenuItem
///
/// One entry of the top-bar navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub target: Route,
}

/// Label of the logout control shown next to the menu.
pub const LOGOUT_LABEL: &str = "Déconnexion";

/// navigation_menu
///
/// Builds the menu for the signed-in identity: the role's dashboard first,
/// then the directory pages. Entries the role gate would reject are left
/// out so the menu never offers a guaranteed `/unauthorized` bounce.
pub fn navigation_menu(identity: &Identity) -> Vec<MenuItem> {
    let candidates = [
        ("Dashboard", policy::landing_route_for(identity)),
        ("Diététiciens", Route::Dietitians),
        ("Infirmiers", Route::Nurses),
        ("Patients", Route::Patients),
        ("Consommables et allergènes", Route::Consumables),
    ];

    candidates
        .into_iter()
        .filter(|(_, target)| match target.family() {
            Some(family) => policy::is_allowed(identity.role, family),
            None => false,
        })
        .map(|(label, target)| MenuItem { label, target })
        .collect()
}
