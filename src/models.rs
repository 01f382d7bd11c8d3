use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::policy::Role;

// --- Session Identity ---

/// Identity
///
/// The authenticated subject for the current session, as returned by
/// `GET /session` and `POST /login`. Only one Identity is active at a time;
/// it lives in the `SessionStore` and is dropped on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Social-security-style subject identifier (NoSS). The backend sends it
    /// as a JSON number; it is normalised to a string for path comparisons.
    #[serde(rename = "noss", deserialize_with = "deserialize_subject_id")]
    pub subject_id: String,

    /// The role claimed by the backend. `None` when the backend sent a role
    /// name this client does not know, which is denied everywhere.
    #[serde(
        default,
        deserialize_with = "deserialize_role_claim",
        serialize_with = "serialize_role_claim"
    )]
    pub role: Option<Role>,

    /// Login name, usually the e-mail address.
    #[serde(default)]
    pub username: String,
}

impl Identity {
    pub fn new(subject_id: impl Into<String>, role: Role, username: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            role: Some(role),
            username: username.into(),
        }
    }

    /// True when this identity is the subject named by a route parameter.
    pub fn is_subject(&self, subject_id: &str) -> bool {
        self.subject_id == subject_id
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubjectIdRepr {
    Text(String),
    Number(i64),
}

fn deserialize_subject_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SubjectIdRepr::deserialize(deserializer)? {
        SubjectIdRepr::Text(s) => s,
        SubjectIdRepr::Number(n) => n.to_string(),
    })
}

fn deserialize_optional_subject_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<SubjectIdRepr>::deserialize(deserializer)?.map(|repr| match repr {
            SubjectIdRepr::Text(s) => s,
            SubjectIdRepr::Number(n) => n.to_string(),
        }),
    )
}

fn deserialize_role_claim<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let role = raw.as_deref().and_then(Role::from_name);
    if role.is_none() {
        tracing::warn!(role = ?raw, "backend sent an unrecognised role");
    }
    Ok(role)
}

fn serialize_role_claim<S>(role: &Option<Role>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match role {
        Some(role) => serializer.serialize_str(role.as_str()),
        None => serializer.serialize_none(),
    }
}

/// Accepts `yyyy-MM-dd`, an RFC 3339 timestamp or epoch milliseconds, which
/// are the three shapes the backend has been seen to emit for `Date` fields.
fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateRepr {
        Text(String),
        Millis(i64),
    }

    let Some(repr) = Option::<DateRepr>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match repr {
        DateRepr::Text(s) if s.is_empty() => Ok(None),
        DateRepr::Text(s) => {
            if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                return Ok(Some(date));
            }
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.date_naive()))
                .map_err(serde::de::Error::custom)
        }
        DateRepr::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
            .map(|dt| Some(dt.date_naive()))
            .ok_or_else(|| serde::de::Error::custom("timestamp out of range")),
    }
}

// --- People ---

/// Patient
///
/// A patient record (`GET /patients/{id}`), including the referring
/// dietitian and the allergens recorded against the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Patient {
    #[serde(rename = "noSS", alias = "noss", deserialize_with = "deserialize_subject_id")]
    pub no_ss: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub email: String,
    #[serde(
        rename = "dateNaissance",
        alias = "date_naissance",
        default,
        deserialize_with = "deserialize_lenient_date"
    )]
    pub date_naissance: Option<NaiveDate>,
    #[serde(default)]
    pub sexe: Option<String>,
    #[serde(
        rename = "nossDieteticien",
        alias = "noss_dieteticien",
        default,
        deserialize_with = "deserialize_optional_subject_id"
    )]
    pub noss_dieteticien: Option<String>,
    #[serde(
        rename = "dateAdmission",
        alias = "date_admission",
        default,
        deserialize_with = "deserialize_lenient_date"
    )]
    pub date_admission: Option<NaiveDate>,
    #[serde(default)]
    pub allergenes: Vec<Allergen>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }

    /// Age in whole years on `today`, or `None` when the birth date is unknown.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_naissance.and_then(|born| today.years_since(born))
    }
}

/// Employee
///
/// The fields shared by dietitians and nurses (`Employe` on the backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Employee {
    #[serde(rename = "noSS", alias = "noss", deserialize_with = "deserialize_subject_id")]
    pub no_ss: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub email: String,
    #[serde(
        rename = "dateNaissance",
        alias = "date_naissance",
        default,
        deserialize_with = "deserialize_lenient_date"
    )]
    pub date_naissance: Option<NaiveDate>,
    #[serde(default)]
    pub sexe: Option<String>,
    #[serde(rename = "idService", alias = "id_service", default)]
    pub id_service: Option<i32>,
    #[serde(
        rename = "dateEmbauche",
        alias = "date_embauche",
        default,
        deserialize_with = "deserialize_lenient_date"
    )]
    pub date_embauche: Option<NaiveDate>,
    #[serde(default)]
    pub statut: Option<String>,
}

/// Dietitian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Dietitian {
    #[serde(flatten)]
    pub employee: Employee,
}

/// Nurse
///
/// A nurse record with the certificates that define their field of practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Nurse {
    #[serde(flatten)]
    pub employee: Employee,
    #[serde(default)]
    pub certificats: Vec<String>,
}

// --- Meals & Catalog ---

/// MealType
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    #[serde(rename = "Petit-déjeuner", alias = "PETITDEJEUNER")]
    Breakfast,
    #[serde(rename = "Déjeuner", alias = "DEJEUNER")]
    Lunch,
    #[serde(rename = "Dîner", alias = "DINER")]
    Dinner,
    #[serde(rename = "Collation", alias = "COLLATION")]
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "Petit-déjeuner",
            MealType::Lunch => "Déjeuner",
            MealType::Dinner => "Dîner",
            MealType::Snack => "Collation",
        }
    }
}

/// Consumable
///
/// A food or drink from the catalog with its nutritional values per portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Consumable {
    pub id: i32,
    pub nom: String,
    // "ALIMENT" or "BOISSON".
    #[serde(default, alias = "typeConsommable")]
    pub type_consommable: Option<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub proteines: f64,
    #[serde(default)]
    pub glucides: f64,
    #[serde(default)]
    pub lipides: f64,
    #[serde(default)]
    pub potassium: f64,
    #[serde(default)]
    pub cholesterol: f64,
    #[serde(default)]
    pub sodium: f64,
    #[serde(default, rename = "vit_A", alias = "vitA")]
    pub vit_a: f64,
    #[serde(default, rename = "vit_C", alias = "vitC")]
    pub vit_c: f64,
    #[serde(default, rename = "vit_D", alias = "vitD")]
    pub vit_d: f64,
    #[serde(default)]
    pub calcium: f64,
    #[serde(default)]
    pub fer: f64,
}

/// ConsumableQuantity
///
/// A catalog consumable together with the quantity eaten in one meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConsumableQuantity {
    #[serde(flatten)]
    pub consumable: Consumable,
    // Grams or millilitres.
    #[serde(default)]
    pub quantite: i32,
}

/// Allergen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Allergen {
    #[serde(alias = "nomAllergene")]
    pub nom_allergene: String,
}

/// Meal
///
/// A meal eaten by a patient (`GET /repas?noss=&date=`), optionally supervised
/// by a nurse. Totals are computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(
        rename = "nossPatient",
        alias = "noss_patient",
        deserialize_with = "deserialize_subject_id"
    )]
    pub noss_patient: String,
    #[serde(
        rename = "nossInfirmier",
        alias = "noss_infirmier",
        default,
        deserialize_with = "deserialize_optional_subject_id"
    )]
    pub noss_infirmier: Option<String>,
    #[serde(rename = "dateConsommation", alias = "date_consommation")]
    pub date_consommation: DateTime<FixedOffset>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(rename = "type", default)]
    pub meal_type: Option<MealType>,
    #[serde(
        rename = "consommables",
        alias = "consommableQuantities",
        alias = "consommable_quantities",
        default
    )]
    pub consommable_quantities: Vec<ConsumableQuantity>,
    #[serde(rename = "totalProteines", alias = "total_proteines", default)]
    pub total_proteines: Option<f64>,
    #[serde(rename = "totalGlucides", alias = "total_glucides", default)]
    pub total_glucides: Option<f64>,
    #[serde(rename = "totalLipides", alias = "total_lipides", default)]
    pub total_lipides: Option<f64>,
    #[serde(rename = "totalCalories", alias = "total_calories", default)]
    pub total_calories: Option<f64>,
    #[serde(rename = "totalHydratation", alias = "total_hydratation", default)]
    pub total_hydratation: Option<f64>,
}

// --- Health & Goals ---

/// ActivityLevel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "Sédentaire", alias = "SEDENTAIRE")]
    Sedentary,
    #[serde(rename = "Légèrement actif", alias = "LEGEREMENT_ACTIF")]
    LightlyActive,
    #[serde(rename = "Modérément actif", alias = "MODEREMENT_ACTIF")]
    ModeratelyActive,
    #[serde(rename = "Très actif", alias = "TRES_ACTIF")]
    VeryActive,
    #[serde(rename = "Extrêmement actif", alias = "EXTREMEMENT_ACTIF")]
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sédentaire",
            ActivityLevel::LightlyActive => "Légèrement actif",
            ActivityLevel::ModeratelyActive => "Modérément actif",
            ActivityLevel::VeryActive => "Très actif",
            ActivityLevel::ExtremelyActive => "Extrêmement actif",
        }
    }
}

/// HealthRecord
///
/// One set of anthropometric measurements for a patient. The body-mass index
/// is computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    #[serde(alias = "nossPatient", deserialize_with = "deserialize_subject_id")]
    pub noss_patient: String,
    pub date: DateTime<FixedOffset>,
    // Centimetres.
    pub taille: f64,
    // Kilograms.
    pub poids: f64,
    #[serde(alias = "tourDeTaille")]
    pub tour_de_taille: f64,
    #[serde(alias = "niveauActivitePhysique", default)]
    pub niveau_activite_physique: Option<ActivityLevel>,
    #[serde(rename = "IMC", alias = "imc", default)]
    pub imc: Option<f64>,
}

/// Goal
///
/// A dietary goal set by a dietitian for one of their patients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub numero: i32,
    #[serde(
        rename = "nossPatient",
        alias = "noss_patient",
        deserialize_with = "deserialize_subject_id"
    )]
    pub noss_patient: String,
    #[serde(
        rename = "nossDieteticien",
        alias = "noss_dieteticien",
        default,
        deserialize_with = "deserialize_optional_subject_id"
    )]
    pub noss_dieteticien: Option<String>,
    #[serde(
        rename = "dateDebut",
        alias = "date_debut",
        default,
        deserialize_with = "deserialize_lenient_date"
    )]
    pub date_debut: Option<NaiveDate>,
    #[serde(
        rename = "dateFin",
        alias = "date_fin",
        default,
        deserialize_with = "deserialize_lenient_date"
    )]
    pub date_fin: Option<NaiveDate>,
    pub titre: String,
    #[serde(default)]
    pub reussi: bool,
    #[serde(rename = "commentaire", alias = "commentaires", default)]
    pub commentaire: Option<String>,
}

// --- Request Payloads ---

/// Credentials
///
/// Body of `POST /login`. The password is forwarded as-is and never logged.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// PatientPayload
///
/// Create (`POST /patients`) and update (`PUT /patients/{id}`) body.
/// `no_ss` is `None` when creating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientPayload {
    #[serde(rename = "noSS")]
    pub no_ss: Option<String>,
    pub nom: String,
    pub prenom: String,
    #[serde(rename = "dateNaissance")]
    pub date_naissance: NaiveDate,
    pub sexe: String,
    pub email: String,
    // NoSS of the referring dietitian, empty when none was picked.
    pub dieteticien: String,
    pub allergies: Vec<String>,
}

/// MealLine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealLine {
    pub id: i32,
    pub quantite: i32,
}

/// NewMeal
///
/// Body of `POST /repas`. `noss_infirmier` is set only when a nurse records
/// the meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeal {
    #[serde(rename = "nossPatient")]
    pub noss_patient: String,
    #[serde(rename = "nossInfirmier")]
    pub noss_infirmier: Option<String>,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub comment: String,
    pub consommables: Vec<MealLine>,
}

/// NewHealthRecord
///
/// Body of `POST /sante`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthRecord {
    pub noss_patient: String,
    pub taille: f64,
    pub poids: f64,
    pub tour_de_taille: f64,
    pub niveau_activite_physique: ActivityLevel,
}
