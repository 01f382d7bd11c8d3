use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::{models::Identity, routes::Route};

/// Role
///
/// The four mutually exclusive roles a session identity can hold. The
/// privilege order is not linear: see `Role::can_access` for the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Administrator,
    Dietitian,
    Nurse,
    Patient,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Administrator, Role::Dietitian, Role::Nurse, Role::Patient];

    /// Wire name used by the backend session payload.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => "Admin",
            Role::Dietitian => "Diététicien",
            Role::Nurse => "Infirmier",
            Role::Patient => "Patient",
        }
    }

    /// Case-insensitive lookup of a backend role name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Role> {
        let name = name.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().to_lowercase() == name.to_lowercase())
    }

    /// can_access
    ///
    /// The coarse role gate applied by the router. Ownership ("self only")
    /// is not decided here: it depends on the route's subject parameter and
    /// is checked by the screen itself (see `owns_subject`).
    pub fn can_access(self, family: RouteFamily) -> bool {
        use RouteFamily::*;
        match self {
            Role::Administrator => true,
            Role::Dietitian => !matches!(family, AdminProfile),
            Role::Nurse => matches!(
                family,
                Nurses | PatientList | PatientDetail | MealDetail | Catalog
            ),
            Role::Patient => matches!(family, PatientDetail | MealDetail | Catalog),
        }
    }

    /// Action permissions for the edit controls shown inside screens.
    pub fn can_perform(self, action: Action) -> bool {
        match action {
            Action::ManagePatients => matches!(self, Role::Administrator | Role::Dietitian),
            Action::RecordHealthData => !matches!(self, Role::Patient),
            Action::RecordMeal => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Role::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role: {name}")))
    }
}

/// RouteFamily
///
/// Groups of gated routes sharing one row of the access matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteFamily {
    AdminProfile,
    Dietitians,
    Nurses,
    PatientList,
    PatientDetail,
    MealDetail,
    Catalog,
}

impl RouteFamily {
    pub const ALL: [RouteFamily; 7] = [
        RouteFamily::AdminProfile,
        RouteFamily::Dietitians,
        RouteFamily::Nurses,
        RouteFamily::PatientList,
        RouteFamily::PatientDetail,
        RouteFamily::MealDetail,
        RouteFamily::Catalog,
    ];
}

/// Action
///
/// Mutating controls a screen may offer, gated per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Create, edit or delete patient records.
    ManagePatients,
    /// Add or delete health measurements.
    RecordHealthData,
    /// Add a meal.
    RecordMeal,
}

/// is_allowed
///
/// Router-level role gate. An unknown role (`None`) is denied everywhere.
pub fn is_allowed(role: Option<Role>, family: RouteFamily) -> bool {
    role.is_some_and(|role| role.can_access(family))
}

/// is_action_allowed
pub fn is_action_allowed(role: Option<Role>, action: Action) -> bool {
    role.is_some_and(|role| role.can_perform(action))
}

/// default_landing_route
///
/// Where an identity lands after login and where the "Dashboard" entries
/// point. Total over the known roles; an unknown role lands on `/unauthorized`.
pub fn default_landing_route(role: Option<Role>, subject_id: &str) -> Route {
    let id = subject_id.to_string();
    match role {
        Some(Role::Administrator) => Route::Admin { id },
        Some(Role::Dietitian) => Route::Dietitian { id },
        Some(Role::Nurse) => Route::Nurse { id },
        Some(Role::Patient) => Route::Patient { id },
        None => Route::Unauthorized,
    }
}

/// landing_route_for
pub fn landing_route_for(identity: &Identity) -> Route {
    default_landing_route(identity.role, &identity.subject_id)
}

/// owns_subject
///
/// Second-stage ownership gate, evaluated by screens once the route's
/// subject parameter is known. `restricted` lists the roles that may only
/// open their own subject on that screen; every other role passes.
pub fn owns_subject(identity: &Identity, subject_id: &str, restricted: &[Role]) -> bool {
    match identity.role {
        Some(role) if restricted.contains(&role) => identity.is_subject(subject_id),
        Some(_) => true,
        None => false,
    }
}
