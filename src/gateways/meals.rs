use serde::Serialize;

use crate::{
    api::ApiClient,
    error::ApiError,
    models::{ConsumableQuantity, Meal, NewMeal},
};

/// MealInterval
///
/// Trailing window applied to a patient's meal history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MealInterval {
    #[default]
    Today,
    Week,
    Month,
    Year,
    All,
}

impl MealInterval {
    pub const ALL: [MealInterval; 5] = [
        MealInterval::Today,
        MealInterval::Week,
        MealInterval::Month,
        MealInterval::Year,
        MealInterval::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealInterval::Today => "Aujourd'hui",
            MealInterval::Week => "Une semaine",
            MealInterval::Month => "Un mois",
            MealInterval::Year => "Une année",
            MealInterval::All => "Tout",
        }
    }

    /// Value of the `interval` query parameter; `None` means no filter.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            MealInterval::Today => Some("0 day"),
            MealInterval::Week => Some("1 week"),
            MealInterval::Month => Some("1 month"),
            MealInterval::Year => Some("1 year"),
            MealInterval::All => None,
        }
    }
}

/// MealGateway
///
/// Single meals are addressed by patient and consumption timestamp.
#[derive(Clone, Debug)]
pub struct MealGateway {
    api: ApiClient,
}

impl MealGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self, patient_id: &str, date: &str) -> Result<Meal, ApiError> {
        self.api
            .get_json_with_query("/repas", &[("noss", patient_id), ("date", date)])
            .await
    }

    pub async fn consumables(&self, patient_id: &str, date: &str) -> Result<Vec<ConsumableQuantity>, ApiError> {
        self.api
            .get_json_with_query("/repas/consommables", &[("noss", patient_id), ("date", date)])
            .await
    }

    pub async fn create(&self, meal: &NewMeal) -> Result<(), ApiError> {
        self.api.post_ack("/repas", Some(meal)).await
    }

    pub async fn delete(&self, patient_id: &str, date: &str) -> Result<(), ApiError> {
        self.api
            .delete("/repas", Some(&[("noss", patient_id), ("date", date)]))
            .await
    }
}
