use super::{filled, missing_fields, rejected};
use crate::{
    error::FormError,
    gateways::Gateways,
    models::{Identity, MealLine, MealType, NewMeal},
    policy::Role,
};

const SAVE_FAILED: &str = "Impossible de créer le repas. Vérifiez les informations saisies.";

/// MealLineInput
///
/// One consumable row of the meal form, as typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MealLineInput {
    pub consumable_id: Option<i32>,
    pub quantite: Option<i32>,
}

/// MealForm
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealForm {
    pub patient_id: String,
    pub meal_type: Option<MealType>,
    pub comment: String,
    pub lines: Vec<MealLineInput>,
}

impl MealForm {
    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            ..Self::default()
        }
    }

    /// validate
    ///
    /// Type, patient and at least one consumable row are required. Every row
    /// needs a catalog id and a positive quantity. When the author is a nurse the meal is
    /// recorded as supervised by them.
    pub fn validate(&self, author: &Identity) -> Result<NewMeal, FormError> {
        let lines: Option<Vec<MealLine>> = self
            .lines
            .iter()
            .map(|line| match (line.consumable_id, line.quantite) {
                (Some(id), Some(quantite)) if quantite > 0 => Some(MealLine { id, quantite }),
                _ => None,
            })
            .collect();

        let missing = missing_fields(&[
            ("type", self.meal_type.is_some()),
            ("nossPatient", filled(&self.patient_id)),
            ("consommables", lines.as_ref().is_some_and(|lines| !lines.is_empty())),
        ]);

        match (self.meal_type, lines) {
            (Some(meal_type), Some(consommables)) if missing.is_empty() => Ok(NewMeal {
                noss_patient: self.patient_id.trim().to_string(),
                noss_infirmier: (author.role == Some(Role::Nurse)).then(|| author.subject_id.clone()),
                meal_type,
                comment: self.comment.clone(),
                consommables,
            }),
            _ => Err(FormError::MissingFields(missing)),
        }
    }

    pub async fn submit(&self, author: &Identity, gateways: &Gateways) -> Result<(), FormError> {
        let meal = self.validate(author)?;
        gateways
            .meals
            .create(&meal)
            .await
            .map_err(|e| rejected(e, SAVE_FAILED))
    }
}
