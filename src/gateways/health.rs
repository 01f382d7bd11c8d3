use crate::{api::ApiClient, error::ApiError, models::NewHealthRecord};

/// HealthGateway
///
/// Writes for health measurements. Reads go through
/// `PatientGateway::health_records`.
#[derive(Clone, Debug)]
pub struct HealthGateway {
    api: ApiClient,
}

impl HealthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create(&self, record: &NewHealthRecord) -> Result<(), ApiError> {
        self.api.post_ack("/sante", Some(record)).await
    }

    /// Deletes the measurement taken at `date` (RFC 3339) for `patient_id`.
    pub async fn delete(&self, patient_id: &str, date: &str) -> Result<(), ApiError> {
        self.api
            .delete("/sante", Some(&[("noss", patient_id), ("date", date)]))
            .await
    }
}
