use crate::{
    api::ApiClient,
    error::ApiError,
    models::{Dietitian, Goal, Patient},
};

/// DietitianGateway
#[derive(Clone, Debug)]
pub struct DietitianGateway {
    api: ApiClient,
}

impl DietitianGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Dietitian>, ApiError> {
        self.api.get_json("/dieteticiens").await
    }

    pub async fn get(&self, id: &str) -> Result<Dietitian, ApiError> {
        self.api.get_json(&format!("/dieteticiens/{id}")).await
    }

    /// Patients this dietitian refers.
    pub async fn patients(&self, id: &str) -> Result<Vec<Patient>, ApiError> {
        self.api.get_json(&format!("/dieteticiens/{id}/patients")).await
    }

    /// Goals this dietitian has set across their patients.
    pub async fn goals(&self, id: &str) -> Result<Vec<Goal>, ApiError> {
        self.api.get_json(&format!("/dieteticiens/{id}/objectifs")).await
    }
}
