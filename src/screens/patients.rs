use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::{
    ScreenOutcome, View,
    charts::{self, DailyIntake, HealthSummary, NutritionSplit},
    require_owner,
};
use crate::{
    error::ApiError,
    gateways::{Gateways, MealInterval},
    models::{Allergen, Dietitian, Goal, HealthRecord, Identity, Meal, Patient},
    policy::{self, Action, Role},
    routes::Route,
};

const LIST_FAILED: &str = "Impossible de récupérer les données.";
const PATIENT_FAILED: &str = "Impossible de charger les informations du patient.";
const MEALS_FAILED: &str = "Impossible de récupérer les repas.";
const HEALTH_FAILED: &str = "Impossible de récupérer les données de santé.";
const GOALS_FAILED: &str = "Impossible de récupérer les objectifs.";
const ALLERGIES_FAILED: &str = "Impossible de récupérer les allergies.";

/// Section
///
/// One independently loaded tab of a screen. A failing tab shows its own
/// inline message without taking the rest of the screen down.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded(T),
    Failed(String),
}

impl<T> Section<T> {
    fn from_result(result: Result<T, ApiError>, message: &str) -> Self {
        match result {
            Ok(value) => Section::Loaded(value),
            Err(e) => {
                tracing::warn!("section failed to load: {}", e);
                Section::Failed(message.to_string())
            }
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        match self {
            Section::Loaded(value) => Section::Loaded(f(value)),
            Section::Failed(message) => Section::Failed(message),
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(value) => Some(value),
            Section::Failed(_) => None,
        }
    }
}

/// PatientRow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRow {
    pub no_ss: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub age: Option<u32>,
    pub link: Route,
}

/// PatientListView
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientListView {
    pub rows: Vec<PatientRow>,
    /// Whether the create/edit/delete controls are offered.
    pub can_manage: bool,
}

/// MealHistory
///
/// The meals tab: the rows for the selected interval and the chart series
/// derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealHistory {
    pub interval: MealInterval,
    pub meals: Vec<MealRow>,
    pub nutrition: NutritionSplit,
    pub daily: Vec<DailyIntake>,
}

/// MealRow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealRow {
    pub meal: Meal,
    pub link: Route,
}

/// HealthHistory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthHistory {
    pub records: Vec<HealthRecord>,
    pub summary: Option<HealthSummary>,
}

/// PatientActions
///
/// Which edit controls the viewer gets on the patient page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatientActions {
    pub can_edit_patient: bool,
    pub can_record_health: bool,
    pub can_record_meal: bool,
}

impl PatientActions {
    fn for_role(role: Option<Role>) -> Self {
        Self {
            can_edit_patient: policy::is_action_allowed(role, Action::ManagePatients),
            can_record_health: policy::is_action_allowed(role, Action::RecordHealthData),
            can_record_meal: policy::is_action_allowed(role, Action::RecordMeal),
        }
    }
}

/// PatientDetailView
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientDetailView {
    pub patient: Patient,
    pub age: Option<u32>,
    pub dietitian: Option<Dietitian>,
    pub meals: Section<MealHistory>,
    pub health: Section<HealthHistory>,
    pub goals: Section<Vec<Goal>>,
    pub allergies: Section<Vec<Allergen>>,
    pub actions: PatientActions,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn patient_list(identity: &Identity, gateways: &Gateways) -> ScreenOutcome {
    let patients = match gateways.patients.list().await {
        Ok(patients) => patients,
        Err(e) => {
            tracing::error!("failed to load patients: {}", e);
            return ScreenOutcome::Failed(LIST_FAILED.to_string());
        }
    };

    let today = today();
    let rows = patients
        .iter()
        .map(|p| PatientRow {
            no_ss: p.no_ss.clone(),
            nom: p.nom.clone(),
            prenom: p.prenom.clone(),
            email: p.email.clone(),
            age: p.age_on(today),
            link: Route::Patient { id: p.no_ss.clone() },
        })
        .collect();

    ScreenOutcome::Ready(View::PatientList(PatientListView {
        rows,
        can_manage: policy::is_action_allowed(identity.role, Action::ManagePatients),
    }))
}

/// patient_detail
///
/// A patient may only open their own record. The patient and the referring
/// dietitian must both load; each tab then loads on its own.
pub(crate) async fn patient_detail(
    identity: &Identity,
    id: &str,
    gateways: &Gateways,
    interval: MealInterval,
) -> ScreenOutcome {
    if let Some(redirect) = require_owner(identity, id, &[Role::Patient]) {
        return redirect;
    }

    let header = tokio::try_join!(gateways.patients.get(id), gateways.patients.dietitian(id));
    let (patient, dietitian) = match header {
        Ok(header) => header,
        Err(e) => {
            tracing::error!(patient = %id, "failed to load patient: {}", e);
            return ScreenOutcome::Failed(PATIENT_FAILED.to_string());
        }
    };

    let (meals, health, goals, allergies) = tokio::join!(
        gateways.patients.meals(id, interval),
        gateways.patients.health_records(id),
        gateways.patients.goals(id),
        gateways.patients.allergies(id),
    );

    let meals = Section::from_result(meals, MEALS_FAILED).map(|meals| meal_history(interval, meals));
    let health = Section::from_result(health, HEALTH_FAILED).map(|records| HealthHistory {
        summary: charts::health_summary(&records),
        records,
    });

    ScreenOutcome::Ready(View::PatientDetail(PatientDetailView {
        age: patient.age_on(today()),
        patient,
        dietitian,
        meals,
        health,
        goals: Section::from_result(goals, GOALS_FAILED),
        allergies: Section::from_result(allergies, ALLERGIES_FAILED),
        actions: PatientActions::for_role(identity.role),
    }))
}

fn meal_history(interval: MealInterval, meals: Vec<Meal>) -> MealHistory {
    let nutrition = charts::nutrition_split(&meals);
    let daily = charts::daily_intake(&meals);
    let meals = meals
        .into_iter()
        .map(|meal| MealRow {
            link: Route::Meal {
                patient_id: meal.noss_patient.clone(),
                date: meal.date_consommation.to_rfc3339(),
            },
            meal,
        })
        .collect();

    MealHistory {
        interval,
        meals,
        nutrition,
        daily,
    }
}
