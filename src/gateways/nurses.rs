use crate::{
    api::ApiClient,
    error::ApiError,
    models::{Meal, Nurse},
};

/// NurseGateway
#[derive(Clone, Debug)]
pub struct NurseGateway {
    api: ApiClient,
}

impl NurseGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Nurse>, ApiError> {
        self.api.get_json("/infirmiers").await
    }

    pub async fn get(&self, id: &str) -> Result<Nurse, ApiError> {
        self.api.get_json(&format!("/infirmiers/{id}")).await
    }

    /// Meals this nurse supervised.
    pub async fn meals(&self, id: &str) -> Result<Vec<Meal>, ApiError> {
        self.api.get_json(&format!("/infirmiers/{id}/repas")).await
    }
}
