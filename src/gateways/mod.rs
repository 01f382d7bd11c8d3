/// Gateway Module Index
///
/// One stateless gateway per entity family. Each operation performs exactly
/// one HTTP call through the shared `ApiClient` and returns the parsed JSON,
/// or the `ApiError` untouched.
use crate::api::ApiClient;

/// Session probe, login and logout. Behind a trait so the session store can
/// be tested without a backend.
pub mod auth;

pub mod catalog;
pub mod dietitians;
pub mod health;
pub mod meals;
pub mod nurses;
pub mod patients;

pub use auth::{AuthGateway, AuthGatewayState, HttpAuthGateway};
pub use catalog::CatalogGateway;
pub use dietitians::DietitianGateway;
pub use health::HealthGateway;
pub use meals::{MealGateway, MealInterval};
pub use nurses::NurseGateway;
pub use patients::PatientGateway;

/// Gateways
///
/// The bundle of resource gateways handed to screens and forms. Cloning is
/// cheap: every gateway shares the same `ApiClient` and cookie jar.
#[derive(Clone, Debug)]
pub struct Gateways {
    pub patients: PatientGateway,
    pub dietitians: DietitianGateway,
    pub nurses: NurseGateway,
    pub meals: MealGateway,
    pub health: HealthGateway,
    pub catalog: CatalogGateway,
}

impl Gateways {
    pub fn new(api: ApiClient) -> Self {
        Self {
            patients: PatientGateway::new(api.clone()),
            dietitians: DietitianGateway::new(api.clone()),
            nurses: NurseGateway::new(api.clone()),
            meals: MealGateway::new(api.clone()),
            health: HealthGateway::new(api.clone()),
            catalog: CatalogGateway::new(api),
        }
    }
}
