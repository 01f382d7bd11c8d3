use serde::Serialize;

use super::{
    ScreenOutcome, View,
    charts::{self, NutritionSplit},
    require_owner,
};
use crate::{
    error::ApiError,
    gateways::Gateways,
    models::{ConsumableQuantity, Identity, Meal, Nurse, Patient},
    policy::Role,
    routes::Route,
};

const MEAL_FAILED: &str = "Impossible de charger les données.";

/// MealDetailView
///
/// One meal with its consumable lines. `nurse` is present only for a
/// supervised meal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDetailView {
    pub patient: Patient,
    pub meal: Meal,
    pub nurse: Option<Nurse>,
    pub consumables: Vec<ConsumableQuantity>,
    pub nutrition: NutritionSplit,
    pub back: Route,
}

/// A patient may only open their own meals.
pub(crate) async fn meal_detail(identity: &Identity, patient_id: &str, date: &str, gateways: &Gateways) -> ScreenOutcome {
    if let Some(redirect) = require_owner(identity, patient_id, &[Role::Patient]) {
        return redirect;
    }

    match load(patient_id, date, gateways).await {
        Ok(view) => ScreenOutcome::Ready(View::MealDetail(view)),
        Err(e) => {
            tracing::error!(patient = %patient_id, date = %date, "failed to load meal: {}", e);
            ScreenOutcome::Failed(MEAL_FAILED.to_string())
        }
    }
}

async fn load(patient_id: &str, date: &str, gateways: &Gateways) -> Result<MealDetailView, ApiError> {
    let (patient, meal, consumables) = tokio::try_join!(
        gateways.patients.get(patient_id),
        gateways.meals.get(patient_id, date),
        gateways.meals.consumables(patient_id, date),
    )?;

    // The supervising nurse is only known once the meal is in.
    let nurse = match meal.noss_infirmier.as_deref() {
        Some(nurse_id) => Some(gateways.nurses.get(nurse_id).await?),
        None => None,
    };

    Ok(MealDetailView {
        nutrition: charts::nutrition_from_lines(&consumables),
        back: Route::Patient {
            id: patient.no_ss.clone(),
        },
        patient,
        meal,
        nurse,
        consumables,
    })
}
