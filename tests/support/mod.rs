//! In-process stand-in for the REST backend, shared by the integration
//! tests. It keeps a cookie session like the real server and records what
//! the client sent so tests can assert on it.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dietetic_portal::{AppConfig, AppState, Navigator};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "motdepasse";

/// Everything the backend saw that tests may want to inspect.
#[derive(Default, Debug)]
pub struct Recorded {
    pub meal_intervals: Vec<Option<String>>,
    pub created_meals: Vec<Value>,
    pub created_patients: Vec<Value>,
    pub updated_patients: Vec<(String, Value)>,
    pub created_health: Vec<Value>,
    pub request_ids: Vec<String>,
    pub logouts: usize,
    pub deletions: Vec<Deletion>,
}

/// One DELETE request, with its query decoded by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub path: String,
    pub noss: Option<String>,
    pub date: Option<String>,
}

#[derive(Clone, Default)]
pub struct Backend {
    pub recorded: Arc<Mutex<Recorded>>,
}

pub struct TestBackend {
    pub address: String,
    pub backend: Backend,
}

impl TestBackend {
    pub fn config(&self) -> AppConfig {
        AppConfig::for_base_url(format!("{}/api", self.address))
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.config()).expect("client builds")
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.backend.recorded.lock().unwrap()
    }
}

pub async fn spawn_backend() -> TestBackend {
    let backend = Backend::default();

    let api = Router::new()
        .route("/session", get(session))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/patients", get(patients).post(create_patient))
        .route(
            "/patients/{id}",
            get(patient).put(update_patient).delete(delete_patient),
        )
        .route("/patients/{id}/dieteticien", get(patient_dietitian))
        .route("/patients/{id}/repas", get(patient_meals))
        .route("/patients/{id}/objectifs", get(patient_goals))
        .route("/patients/{id}/allergies", get(patient_allergies))
        .route("/patients/{id}/sante", get(patient_health))
        .route("/dieteticiens", get(dietitians))
        .route("/dieteticiens/{id}", get(dietitian))
        .route("/dieteticiens/{id}/patients", get(dietitian_patients))
        .route("/dieteticiens/{id}/objectifs", get(dietitian_goals))
        .route("/infirmiers", get(nurses))
        .route("/infirmiers/{id}", get(nurse))
        .route("/infirmiers/{id}/repas", get(nurse_meals))
        .route("/repas", get(meal).post(create_meal).delete(delete_meal))
        .route("/repas/consommables", get(meal_consumables))
        .route("/sante", post(create_health).delete(delete_health))
        .route("/consommables", get(consumables))
        .route("/allergenes", get(allergens));

    let router = Router::new().nest("/api", api).with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestBackend { address, backend }
}

/// Builds a navigator against the mock backend the way the client starts:
/// restore the session first, then optionally sign in.
pub async fn navigator_as(app: &TestBackend, username: Option<&str>) -> Navigator {
    let state = app.app_state();
    state.session.restore_session().await;
    if let Some(username) = username {
        state.session.sign_in(username, PASSWORD).await.expect("sign-in");
    }
    Navigator::new(state)
}

// --- Fixtures ---

/// (username, noss, role)
const ACCOUNTS: [(&str, i64, &str); 4] = [
    ("admin@example.org", 1, "Admin"),
    ("claire.dupont@example.org", 10, "Diététicien"),
    ("marc.leroy@example.org", 20, "Infirmier"),
    ("alice.martin@example.org", 123, "Patient"),
];

fn identity_json(noss: i64) -> Option<Value> {
    ACCOUNTS
        .iter()
        .find(|(_, id, _)| *id == noss)
        .map(|(username, noss, role)| json!({ "username": username, "role": role, "noss": noss }))
}

pub fn patient_json(noss: i64) -> Option<Value> {
    match noss {
        123 => Some(json!({
            "noSS": 123, "nom": "Martin", "prenom": "Alice", "email": "alice.martin@example.org",
            "dateNaissance": "1990-04-12", "sexe": "F", "nossDieteticien": 10,
            "dateAdmission": "2024-01-05", "allergenes": [{ "nom_allergene": "Arachides" }]
        })),
        456 => Some(json!({
            "noSS": 456, "nom": "Bernard", "prenom": "Paul", "email": "paul.bernard@example.org",
            "dateNaissance": 637804800000i64, "sexe": "M", "nossDieteticien": null,
            "dateAdmission": null, "allergenes": []
        })),
        _ => None,
    }
}

fn dietitian_json() -> Value {
    json!({
        "noSS": 10, "nom": "Dupont", "prenom": "Claire", "email": "claire.dupont@example.org",
        "dateNaissance": "1980-02-01", "sexe": "F", "idService": 1,
        "dateEmbauche": "2015-09-01", "statut": "Actif"
    })
}

fn nurse_json() -> Value {
    json!({
        "noSS": 20, "nom": "Leroy", "prenom": "Marc", "email": "marc.leroy@example.org",
        "dateNaissance": "1985-07-23", "sexe": "M", "idService": 2,
        "dateEmbauche": "2018-03-15", "statut": "Actif",
        "certificats": ["Soins intensifs"]
    })
}

pub const MEAL_DATE: &str = "2024-05-01T12:30:00+02:00";

fn meals_json() -> Value {
    json!([
        {
            "nossPatient": 123, "nossInfirmier": 20, "dateConsommation": MEAL_DATE,
            "comment": "Bon appétit", "type": "Déjeuner",
            "consommables": [
                { "id": 1, "nom": "Pomme", "type_consommable": "ALIMENT", "calories": 52, "proteines": 0.3,
                  "glucides": 14, "lipides": 0.2, "quantite": 200 }
            ],
            "totalProteines": 20.0, "totalGlucides": 60.0, "totalLipides": 10.0,
            "totalCalories": 410.0, "totalHydratation": 250.0
        },
        {
            "nossPatient": 123, "nossInfirmier": null, "dateConsommation": "2024-05-01T19:00:00+02:00",
            "comment": null, "type": "Dîner", "consommables": [],
            "totalProteines": 15.0, "totalGlucides": 40.0, "totalLipides": 12.0,
            "totalCalories": 330.0, "totalHydratation": 300.0
        },
        {
            "nossPatient": 123, "nossInfirmier": null, "dateConsommation": "2024-05-02T08:00:00+02:00",
            "comment": null, "type": "PETITDEJEUNER", "consommables": [],
            "totalProteines": 8.0, "totalGlucides": 45.0, "totalLipides": 6.0,
            "totalCalories": 260.0, "totalHydratation": null
        }
    ])
}

fn consumable_lines_json() -> Value {
    json!([
        { "id": 1, "nom": "Pomme", "type_consommable": "ALIMENT", "calories": 52, "proteines": 0.3,
          "glucides": 14, "lipides": 0.2, "quantite": 200 },
        { "id": 2, "nom": "Riz", "type_consommable": "ALIMENT", "calories": 130, "proteines": 2.7,
          "glucides": 28, "lipides": 0.3, "quantite": 150 }
    ])
}

fn health_json() -> Value {
    json!([
        { "noss_patient": 123, "date": "2024-04-01T08:00:00+02:00", "taille": 170.0, "poids": 66.0,
          "tour_de_taille": 82.0, "niveau_activite_physique": "Modérément actif", "IMC": 22.84 },
        { "noss_patient": 123, "date": "2024-05-01T08:00:00+02:00", "taille": 170.0, "poids": 65.0,
          "tour_de_taille": 80.5, "niveau_activite_physique": "MODEREMENT_ACTIF", "IMC": 22.49 },
        { "noss_patient": 123, "date": "2024-06-01T08:00:00+02:00", "taille": 170.0, "poids": 64.0,
          "tour_de_taille": 79.0, "niveau_activite_physique": "Très actif", "IMC": 22.15 }
    ])
}

fn goals_json() -> Value {
    json!([
        { "numero": 1, "nossPatient": 123, "nossDieteticien": 10, "dateDebut": "2024-01-10",
          "dateFin": "2024-06-10", "titre": "Réduire le sucre", "reussi": false, "commentaire": "Bon progrès" }
    ])
}

// --- Session Handling ---

fn session_of(headers: &HeaderMap) -> Option<i64> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("session="))
        .find_map(|id| id.parse().ok())
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Non authentifié")
}

/// Rejects requests without the session cookie, and records the correlation id.
fn authorize(backend: &Backend, headers: &HeaderMap) -> Result<i64, Response> {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        backend.recorded.lock().unwrap().request_ids.push(id.to_string());
    }
    session_of(headers).ok_or_else(unauthorized)
}

async fn session(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    match authorize(&backend, &headers).ok().and_then(identity_json) {
        Some(identity) => Json(identity).into_response(),
        None => unauthorized(),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let account = ACCOUNTS.iter().find(|(name, _, _)| *name == username);
    match account {
        Some((_, noss, _)) if password == PASSWORD => {
            let cookie = format!("session={noss}; Path=/; HttpOnly");
            ([(header::SET_COOKIE, cookie)], Json(identity_json(*noss))).into_response()
        }
        _ => error(StatusCode::UNAUTHORIZED, "Identifiants invalides"),
    }
}

async fn logout(State(backend): State<Backend>) -> Response {
    backend.recorded.lock().unwrap().logouts += 1;
    (
        [(header::SET_COOKIE, "session=; Path=/; Max-Age=0")],
        Json(json!({ "message": "Déconnecté" })),
    )
        .into_response()
}

// --- Patients ---

async fn patients(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(json!([patient_json(123), patient_json(456)])).into_response()
}

async fn patient(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    match patient_json(id) {
        Some(patient) => Json(patient).into_response(),
        None => error(StatusCode::NOT_FOUND, "Patient introuvable"),
    }
}

async fn create_patient(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    if body["nom"] == "Doublon" {
        return error(StatusCode::CONFLICT, "Ce patient existe déjà.");
    }
    b.recorded.lock().unwrap().created_patients.push(body);
    (StatusCode::CREATED, Json(json!({ "message": "Patient créé" }))).into_response()
}

async fn update_patient(
    State(b): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    b.recorded.lock().unwrap().updated_patients.push((id, body));
    Json(json!({ "message": "Patient mis à jour" })).into_response()
}

async fn delete_patient(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    if patient_json(id).is_none() {
        return error(StatusCode::NOT_FOUND, "Patient introuvable");
    }
    b.recorded.lock().unwrap().deletions.push(Deletion {
        path: format!("/patients/{id}"),
        noss: None,
        date: None,
    });
    Json(json!({ "message": "Patient supprimé" })).into_response()
}

async fn patient_dietitian(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    match id {
        123 => Json(dietitian_json()).into_response(),
        _ => Json(Value::Null).into_response(),
    }
}

async fn patient_meals(
    State(b): State<Backend>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    b.recorded
        .lock()
        .unwrap()
        .meal_intervals
        .push(query.get("interval").cloned());
    Json(meals_json()).into_response()
}

async fn patient_goals(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(goals_json()).into_response()
}

/// Patient 456's allergies endpoint is broken, to exercise partial failures.
async fn patient_allergies(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    match id {
        456 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!([{ "nom_allergene": "Arachides" }])).into_response(),
    }
}

async fn patient_health(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    match id {
        123 => Json(health_json()).into_response(),
        _ => Json(json!([])).into_response(),
    }
}

// --- Staff ---

async fn dietitians(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(json!([dietitian_json()])).into_response()
}

async fn dietitian(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    match id {
        10 => Json(dietitian_json()).into_response(),
        _ => error(StatusCode::NOT_FOUND, "Diététicien introuvable"),
    }
}

async fn dietitian_patients(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(json!([patient_json(123)])).into_response()
}

async fn dietitian_goals(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(goals_json()).into_response()
}

/// The nurse directory answers slowly, so a second navigation can overtake it.
async fn nurses(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;
    Json(json!([nurse_json()])).into_response()
}

async fn nurse(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    match id {
        20 => Json(nurse_json()).into_response(),
        _ => error(StatusCode::NOT_FOUND, "Infirmier introuvable"),
    }
}

async fn nurse_meals(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    let meals = meals_json();
    Json(json!([meals[0]])).into_response()
}

// --- Meals, Health & Catalog ---

async fn meal(State(b): State<Backend>, headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    let meals = meals_json();
    let found = meals.as_array().and_then(|meals| {
        meals.iter().find(|m| {
            Some(m["nossPatient"].to_string()) == query.get("noss").cloned()
                && m["dateConsommation"].as_str() == query.get("date").map(String::as_str)
        })
    });
    match found {
        Some(meal) => Json(meal.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Repas introuvable"),
    }
}

/// Deletes only a meal that exists in the fixtures, matched on the decoded
/// `noss` and `date` query values.
async fn delete_meal(
    State(b): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    let noss = query.get("noss").cloned();
    let date = query.get("date").cloned();
    let exists = meals_json().as_array().is_some_and(|meals| {
        meals.iter().any(|m| {
            Some(m["nossPatient"].to_string()) == noss && m["dateConsommation"].as_str() == date.as_deref()
        })
    });
    if !exists {
        return error(StatusCode::NOT_FOUND, "Repas introuvable");
    }
    b.recorded.lock().unwrap().deletions.push(Deletion {
        path: "/repas".to_string(),
        noss,
        date,
    });
    Json(json!({ "message": "Repas supprimé" })).into_response()
}

async fn meal_consumables(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(consumable_lines_json()).into_response()
}

async fn create_meal(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    let unknown = body["consommables"]
        .as_array()
        .is_some_and(|lines| lines.iter().any(|line| line["id"] == 999));
    if unknown {
        return error(StatusCode::BAD_REQUEST, "Consommable inconnu : 999");
    }
    b.recorded.lock().unwrap().created_meals.push(body);
    (StatusCode::CREATED, Json(json!({ "message": "Repas créé" }))).into_response()
}

/// Refuses implausible weights without an error body.
async fn create_health(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    if body["poids"].as_f64().is_none_or(|poids| poids <= 0.0) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    b.recorded.lock().unwrap().created_health.push(body);
    StatusCode::CREATED.into_response()
}

async fn delete_health(
    State(b): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    b.recorded.lock().unwrap().deletions.push(Deletion {
        path: "/sante".to_string(),
        noss: query.get("noss").cloned(),
        date: query.get("date").cloned(),
    });
    Json(json!({ "message": "Données supprimées" })).into_response()
}

async fn consumables(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(json!([
        { "id": 1, "nom": "Pomme", "type_consommable": "ALIMENT", "calories": 52, "proteines": 0.3,
          "glucides": 14, "lipides": 0.2, "vit_C": 4.6 },
        { "id": 3, "nom": "Eau", "type_consommable": "BOISSON", "calories": 0 }
    ]))
    .into_response()
}

async fn allergens(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&b, &headers) {
        return r;
    }
    Json(json!([{ "nom_allergene": "Arachides" }, { "nom_allergene": "Gluten" }])).into_response()
}
