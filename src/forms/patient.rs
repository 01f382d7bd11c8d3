use chrono::NaiveDate;

use super::{filled, missing_fields, rejected};
use crate::{
    error::FormError,
    gateways::Gateways,
    models::{Patient, PatientPayload},
};

const SAVE_FAILED: &str = "Une erreur est survenue lors de l'enregistrement.";

/// PatientForm
///
/// Create or edit a patient record. `no_ss` is set when editing an existing
/// patient, which turns the submission into an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientForm {
    pub no_ss: Option<String>,
    pub nom: String,
    pub prenom: String,
    pub date_naissance: Option<NaiveDate>,
    pub sexe: String,
    pub email: String,
    // NoSS of the referring dietitian; optional.
    pub dieteticien: String,
    pub allergies: Vec<String>,
}

impl PatientForm {
    /// Prefills the form from an existing record.
    pub fn edit(patient: &Patient) -> Self {
        Self {
            no_ss: Some(patient.no_ss.clone()),
            nom: patient.nom.clone(),
            prenom: patient.prenom.clone(),
            date_naissance: patient.date_naissance,
            sexe: patient.sexe.clone().unwrap_or_default(),
            email: patient.email.clone(),
            dieteticien: patient.noss_dieteticien.clone().unwrap_or_default(),
            allergies: patient
                .allergenes
                .iter()
                .map(|a| a.nom_allergene.clone())
                .collect(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.no_ss.is_some()
    }

    pub fn validate(&self) -> Result<PatientPayload, FormError> {
        let missing = missing_fields(&[
            ("nom", filled(&self.nom)),
            ("prenom", filled(&self.prenom)),
            ("dateNaissance", self.date_naissance.is_some()),
            ("sexe", filled(&self.sexe)),
            ("email", filled(&self.email)),
        ]);

        match self.date_naissance {
            Some(date_naissance) if missing.is_empty() => Ok(PatientPayload {
                no_ss: self.no_ss.clone(),
                nom: self.nom.trim().to_string(),
                prenom: self.prenom.trim().to_string(),
                date_naissance,
                sexe: self.sexe.trim().to_string(),
                email: self.email.trim().to_string(),
                dieteticien: self.dieteticien.trim().to_string(),
                allergies: self.allergies.clone(),
            }),
            _ => Err(FormError::MissingFields(missing)),
        }
    }

    pub async fn submit(&self, gateways: &Gateways) -> Result<(), FormError> {
        let payload = self.validate()?;

        let saved = match &self.no_ss {
            Some(id) => gateways.patients.update(id, &payload).await,
            None => gateways.patients.create(&payload).await,
        };

        saved.map_err(|e| rejected(e, SAVE_FAILED))
    }
}
