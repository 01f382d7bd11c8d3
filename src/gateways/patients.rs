use crate::{
    api::ApiClient,
    error::ApiError,
    models::{Allergen, Dietitian, Goal, HealthRecord, Meal, Patient, PatientPayload},
};

use super::meals::MealInterval;

/// PatientGateway
///
/// Patient records and the `/patients/{id}/*` sub-resources.
#[derive(Clone, Debug)]
pub struct PatientGateway {
    api: ApiClient,
}

impl PatientGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Patient>, ApiError> {
        self.api.get_json("/patients").await
    }

    pub async fn get(&self, id: &str) -> Result<Patient, ApiError> {
        self.api.get_json(&format!("/patients/{id}")).await
    }

    /// The patient's referring dietitian; `None` when the backend sends `null`.
    pub async fn dietitian(&self, id: &str) -> Result<Option<Dietitian>, ApiError> {
        self.api.get_json(&format!("/patients/{id}/dieteticien")).await
    }

    /// Meal history, optionally restricted to a trailing interval.
    pub async fn meals(&self, id: &str, interval: MealInterval) -> Result<Vec<Meal>, ApiError> {
        let path = format!("/patients/{id}/repas");
        match interval.query_value() {
            Some(value) => {
                self.api
                    .get_json_with_query(&path, &[("interval", value)])
                    .await
            }
            None => self.api.get_json(&path).await,
        }
    }

    pub async fn goals(&self, id: &str) -> Result<Vec<Goal>, ApiError> {
        self.api.get_json(&format!("/patients/{id}/objectifs")).await
    }

    pub async fn allergies(&self, id: &str) -> Result<Vec<Allergen>, ApiError> {
        self.api.get_json(&format!("/patients/{id}/allergies")).await
    }

    pub async fn health_records(&self, id: &str) -> Result<Vec<HealthRecord>, ApiError> {
        self.api.get_json(&format!("/patients/{id}/sante")).await
    }

    pub async fn create(&self, payload: &PatientPayload) -> Result<(), ApiError> {
        self.api.post_ack("/patients", Some(payload)).await
    }

    pub async fn update(&self, id: &str, payload: &PatientPayload) -> Result<(), ApiError> {
        self.api.put_ack(&format!("/patients/{id}"), payload).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete::<()>(&format!("/patients/{id}"), None).await
    }
}
