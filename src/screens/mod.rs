/// Screen Module Index
///
/// Screens load their data through the gateways and return a serializable
/// view model. Rendering (tables, dialogs, charts) happens outside this
/// crate. Every screen behind a gated route may additionally apply the
/// ownership gate, since only it knows the route's subject parameter.
use serde::Serialize;

use crate::{
    gateways::{Gateways, MealInterval},
    models::Identity,
    policy::{self, Role},
    routes::Route,
};

pub mod catalog;
pub mod charts;
pub mod meals;
pub mod patients;
pub mod public;
pub mod staff;

pub use catalog::CatalogView;
pub use meals::MealDetailView;
pub use patients::{PatientDetailView, PatientListView, Section};
pub use public::{HomeView, LoginView, UnauthorizedView};
pub use staff::{AdminView, DietitianDetailView, DietitianListView, NurseDetailView, NurseListView};

/// ScreenOutcome
///
/// Result of loading a screen. Fetch failures never escape as errors: they
/// become `Failed` with the inline message the screen displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "content", rename_all = "snake_case")]
pub enum ScreenOutcome {
    Ready(View),
    Redirect(Route),
    Failed(String),
}

/// View
///
/// The view model of each screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum View {
    Home(HomeView),
    Login(LoginView),
    Unauthorized(UnauthorizedView),
    NotFound { path: String },
    Admin(AdminView),
    DietitianList(DietitianListView),
    DietitianDetail(DietitianDetailView),
    NurseList(NurseListView),
    NurseDetail(NurseDetailView),
    PatientList(PatientListView),
    PatientDetail(PatientDetailView),
    MealDetail(MealDetailView),
    Catalog(CatalogView),
}

/// ViewOptions
///
/// User-selected view parameters that are not part of the path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Window of the patient meal-history tab.
    pub meal_interval: MealInterval,
}

/// load
///
/// Dispatches a route the guard allowed to its screen loader. `identity` is
/// `None` only for public routes.
pub async fn load(
    route: &Route,
    identity: Option<&Identity>,
    gateways: &Gateways,
    options: ViewOptions,
) -> ScreenOutcome {
    match (route, identity) {
        (Route::Home, _) => public::home(),
        (Route::Login, identity) => public::login(identity),
        (Route::Unauthorized, identity) => public::unauthorized(identity),
        (Route::NotFound { path }, _) => ScreenOutcome::Ready(View::NotFound { path: path.clone() }),

        // A gated route without an identity means the guard was bypassed.
        (_, None) => ScreenOutcome::Redirect(Route::Login),

        (Route::Admin { id }, Some(identity)) => staff::admin(identity, id),
        (Route::Dietitians, Some(_)) => staff::dietitian_list(gateways).await,
        (Route::Dietitian { id }, Some(identity)) => staff::dietitian_detail(identity, id, gateways).await,
        (Route::Nurses, Some(_)) => staff::nurse_list(gateways).await,
        (Route::Nurse { id }, Some(identity)) => staff::nurse_detail(identity, id, gateways).await,
        (Route::Patients, Some(identity)) => patients::patient_list(identity, gateways).await,
        (Route::Patient { id }, Some(identity)) => {
            patients::patient_detail(identity, id, gateways, options.meal_interval).await
        }
        (Route::Meal { patient_id, date }, Some(identity)) => {
            meals::meal_detail(identity, patient_id, date, gateways).await
        }
        (Route::Consumables, Some(_)) => catalog::catalog(gateways).await,
    }
}

/// require_owner
///
/// The screen-level ownership gate. Returns the redirect to take when
/// `identity` holds one of the `restricted` roles and is not `subject_id`.
pub(crate) fn require_owner(identity: &Identity, subject_id: &str, restricted: &[Role]) -> Option<ScreenOutcome> {
    if policy::owns_subject(identity, subject_id, restricted) {
        None
    } else {
        tracing::debug!(
            subject = %subject_id,
            viewer = %identity.subject_id,
            "ownership gate denied screen"
        );
        Some(ScreenOutcome::Redirect(Route::Unauthorized))
    }
}
