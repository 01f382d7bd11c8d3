use serde::Serialize;
use std::collections::HashMap;

use super::{ScreenOutcome, View, require_owner};
use crate::{
    gateways::Gateways,
    models::{Dietitian, Goal, Identity, MealType, Nurse, Patient},
    policy::Role,
    routes::Route,
};

const LIST_FAILED: &str = "Impossible de récupérer les données.";
const DETAIL_FAILED: &str = "Impossible de charger les informations.";

/// AdminView
///
/// The administrator's own page. There is no admin record on the backend,
/// so it shows the session identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminView {
    pub identity: Identity,
}

/// StaffRow
///
/// One line of the dietitian or nurse table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffRow {
    pub no_ss: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub link: Route,
}

/// DietitianListView
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DietitianListView {
    pub rows: Vec<StaffRow>,
}

/// NurseListView
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NurseListView {
    pub rows: Vec<StaffRow>,
}

/// PatientLink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientLink {
    pub no_ss: String,
    pub name: String,
    pub link: Route,
}

impl From<&Patient> for PatientLink {
    fn from(patient: &Patient) -> Self {
        Self {
            no_ss: patient.no_ss.clone(),
            name: patient.full_name(),
            link: Route::Patient {
                id: patient.no_ss.clone(),
            },
        }
    }
}

/// DietitianDetailView
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietitianDetailView {
    pub dietitian: Dietitian,
    pub patients: Vec<PatientLink>,
    pub goals: Vec<Goal>,
}

/// SupervisedMeal
///
/// A meal the nurse supervised, with the patient's name resolved from the
/// patient list and a link to the meal page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisedMeal {
    pub patient: String,
    pub meal_type: Option<MealType>,
    pub date: String,
    pub link: Route,
}

/// NurseDetailView
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NurseDetailView {
    pub nurse: Nurse,
    pub patients: Vec<PatientLink>,
    pub meals: Vec<SupervisedMeal>,
}

pub(crate) fn admin(identity: &Identity, id: &str) -> ScreenOutcome {
    if let Some(redirect) = require_owner(identity, id, &[Role::Administrator]) {
        return redirect;
    }

    ScreenOutcome::Ready(View::Admin(AdminView {
        identity: identity.clone(),
    }))
}

pub(crate) async fn dietitian_list(gateways: &Gateways) -> ScreenOutcome {
    match gateways.dietitians.list().await {
        Ok(dietitians) => {
            let rows = dietitians
                .iter()
                .map(|d| {
                    let e = &d.employee;
                    StaffRow {
                        no_ss: e.no_ss.clone(),
                        nom: e.nom.clone(),
                        prenom: e.prenom.clone(),
                        email: e.email.clone(),
                        link: Route::Dietitian { id: e.no_ss.clone() },
                    }
                })
                .collect();
            ScreenOutcome::Ready(View::DietitianList(DietitianListView { rows }))
        }
        Err(e) => {
            tracing::error!("failed to load dietitians: {}", e);
            ScreenOutcome::Failed(LIST_FAILED.to_string())
        }
    }
}

/// A dietitian may only open their own page; administrators open any.
pub(crate) async fn dietitian_detail(identity: &Identity, id: &str, gateways: &Gateways) -> ScreenOutcome {
    if let Some(redirect) = require_owner(identity, id, &[Role::Dietitian]) {
        return redirect;
    }

    let loaded = tokio::try_join!(
        gateways.dietitians.get(id),
        gateways.dietitians.patients(id),
        gateways.dietitians.goals(id),
    );

    match loaded {
        Ok((dietitian, patients, goals)) => ScreenOutcome::Ready(View::DietitianDetail(DietitianDetailView {
            dietitian,
            patients: patients.iter().map(PatientLink::from).collect(),
            goals,
        })),
        Err(e) => {
            tracing::error!(dietitian = %id, "failed to load dietitian page: {}", e);
            ScreenOutcome::Failed(DETAIL_FAILED.to_string())
        }
    }
}

pub(crate) async fn nurse_list(gateways: &Gateways) -> ScreenOutcome {
    match gateways.nurses.list().await {
        Ok(nurses) => {
            let rows = nurses
                .iter()
                .map(|n| {
                    let e = &n.employee;
                    StaffRow {
                        no_ss: e.no_ss.clone(),
                        nom: e.nom.clone(),
                        prenom: e.prenom.clone(),
                        email: e.email.clone(),
                        link: Route::Nurse { id: e.no_ss.clone() },
                    }
                })
                .collect();
            ScreenOutcome::Ready(View::NurseList(NurseListView { rows }))
        }
        Err(e) => {
            tracing::error!("failed to load nurses: {}", e);
            ScreenOutcome::Failed(LIST_FAILED.to_string())
        }
    }
}

/// A nurse may only open their own page.
pub(crate) async fn nurse_detail(identity: &Identity, id: &str, gateways: &Gateways) -> ScreenOutcome {
    if let Some(redirect) = require_owner(identity, id, &[Role::Nurse]) {
        return redirect;
    }

    let loaded = tokio::try_join!(
        gateways.nurses.get(id),
        gateways.patients.list(),
        gateways.nurses.meals(id),
    );

    let (nurse, patients, meals) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(nurse = %id, "failed to load nurse page: {}", e);
            return ScreenOutcome::Failed(DETAIL_FAILED.to_string());
        }
    };

    let names: HashMap<&str, String> = patients
        .iter()
        .map(|p| (p.no_ss.as_str(), p.full_name()))
        .collect();

    let meals = meals
        .iter()
        .map(|meal| {
            let date = meal.date_consommation.to_rfc3339();
            SupervisedMeal {
                patient: names
                    .get(meal.noss_patient.as_str())
                    .cloned()
                    .unwrap_or_else(|| meal.noss_patient.clone()),
                meal_type: meal.meal_type,
                link: Route::Meal {
                    patient_id: meal.noss_patient.clone(),
                    date: date.clone(),
                },
                date,
            }
        })
        .collect();

    ScreenOutcome::Ready(View::NurseDetail(NurseDetailView {
        nurse,
        patients: patients.iter().map(PatientLink::from).collect(),
        meals,
    }))
}
