use super::{filled, missing_fields, rejected};
use crate::{
    error::FormError,
    gateways::Gateways,
    models::{ActivityLevel, NewHealthRecord},
};

const SAVE_FAILED: &str = "Impossible d'enregistrer les données de santé.";

/// HealthRecordForm
///
/// A new set of measurements for one patient. Lengths in centimetres,
/// weight in kilograms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthRecordForm {
    pub patient_id: String,
    pub taille: Option<f64>,
    pub poids: Option<f64>,
    pub tour_de_taille: Option<f64>,
    pub niveau_activite_physique: Option<ActivityLevel>,
}

impl HealthRecordForm {
    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<NewHealthRecord, FormError> {
        let missing = missing_fields(&[
            ("noss_patient", filled(&self.patient_id)),
            ("taille", self.taille.is_some()),
            ("poids", self.poids.is_some()),
            ("tour_de_taille", self.tour_de_taille.is_some()),
            ("niveau_activite_physique", self.niveau_activite_physique.is_some()),
        ]);

        match (self.taille, self.poids, self.tour_de_taille, self.niveau_activite_physique) {
            (Some(taille), Some(poids), Some(tour_de_taille), Some(niveau_activite_physique)) if missing.is_empty() => {
                Ok(NewHealthRecord {
                    noss_patient: self.patient_id.trim().to_string(),
                    taille,
                    poids,
                    tour_de_taille,
                    niveau_activite_physique,
                })
            }
            _ => Err(FormError::MissingFields(missing)),
        }
    }

    pub async fn submit(&self, gateways: &Gateways) -> Result<(), FormError> {
        let record = self.validate()?;
        gateways
            .health
            .create(&record)
            .await
            .map_err(|e| rejected(e, SAVE_FAILED))
    }
}
