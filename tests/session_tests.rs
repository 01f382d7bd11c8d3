use async_trait::async_trait;
use dietetic_portal::{
    ApiClient, ApiError, AppConfig, AppState, AuthGateway, AuthGatewayState, Navigator, Route,
    SessionState, SessionStore,
    models::{Credentials, Identity},
    policy::Role,
    routes::{GuardDecision, guard},
};
use reqwest::StatusCode;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::sync::Notify;

// --- Scripted Auth Gateways ---

/// What the scripted `GET /session` answers.
#[derive(Clone)]
enum Probe {
    Identity(Identity),
    Unauthorized,
    ServerError,
}

struct ScriptedAuth {
    probe: Probe,
    logout_fails: bool,
    logout_calls: AtomicUsize,
}

impl ScriptedAuth {
    fn new(probe: Probe) -> Self {
        Self {
            probe,
            logout_fails: false,
            logout_calls: AtomicUsize::new(0),
        }
    }

    fn failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: None,
    }
}

#[async_trait]
impl AuthGateway for ScriptedAuth {
    async fn check_session(&self) -> Result<Option<Identity>, ApiError> {
        match &self.probe {
            Probe::Identity(identity) => Ok(Some(identity.clone())),
            Probe::Unauthorized => Ok(None),
            Probe::ServerError => Err(server_error()),
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<Identity, ApiError> {
        if credentials.password == "secret" {
            Ok(Identity::new("321", Role::Dietitian, credentials.username.clone()))
        } else {
            Err(ApiError::Status {
                status: StatusCode::UNAUTHORIZED,
                message: Some("Mot de passe incorrect".to_string()),
            })
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails { Err(server_error()) } else { Ok(()) }
    }
}

/// Holds `GET /session` until released, to observe the loading window.
struct SlowProbe {
    release: Arc<Notify>,
    identity: Identity,
}

#[async_trait]
impl AuthGateway for SlowProbe {
    async fn check_session(&self) -> Result<Option<Identity>, ApiError> {
        self.release.notified().await;
        Ok(Some(self.identity.clone()))
    }

    async fn login(&self, _credentials: &Credentials) -> Result<Identity, ApiError> {
        Err(server_error())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn store(auth: impl AuthGateway + 'static) -> SessionStore {
    SessionStore::new(Arc::new(auth) as AuthGatewayState)
}

// --- Restore ---

#[tokio::test]
async fn test_starts_loading_with_no_identity() {
    let session = store(ScriptedAuth::new(Probe::Unauthorized));
    assert!(session.is_loading());
    assert_eq!(session.current_identity(), None);
    assert_eq!(session.snapshot(), SessionState::Unknown);
}

#[tokio::test]
async fn test_restore_adopts_existing_session() {
    let identity = Identity::new("123", Role::Patient, "p@example.org");
    let session = store(ScriptedAuth::new(Probe::Identity(identity.clone())));

    session.restore_session().await;

    assert!(!session.is_loading());
    assert_eq!(session.current_identity(), Some(identity));
}

#[tokio::test]
async fn test_restore_with_401_is_anonymous_and_gated_routes_go_to_login() {
    let session = store(ScriptedAuth::new(Probe::Unauthorized));

    session.restore_session().await;

    assert!(!session.is_loading());
    assert_eq!(session.current_identity(), None);
    assert_eq!(
        guard(&session.snapshot(), &Route::Patients),
        GuardDecision::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_restore_failure_is_fail_closed() {
    let session = store(ScriptedAuth::new(Probe::ServerError));

    session.restore_session().await;

    assert_eq!(session.snapshot(), SessionState::Anonymous);
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_late_restore_does_not_override_login() {
    let release = Arc::new(Notify::new());
    let restored = Identity::new("1", Role::Administrator, "old@example.org");
    let session = Arc::new(store(SlowProbe {
        release: release.clone(),
        identity: restored,
    }));

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.restore_session().await }
    });

    // Let the probe start, then sign in before it answers.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let fresh = Identity::new("2", Role::Nurse, "new@example.org");
    session.login(fresh.clone());

    release.notify_one();
    pending.await.unwrap();

    assert_eq!(session.current_identity(), Some(fresh));
}

// --- Sign-in / Logout ---

#[tokio::test]
async fn test_sign_in_adopts_identity() {
    let session = store(ScriptedAuth::new(Probe::Unauthorized));
    session.restore_session().await;

    let identity = session.sign_in("d@example.org", "secret").await.unwrap();

    assert_eq!(identity.role, Some(Role::Dietitian));
    assert_eq!(session.current_identity(), Some(identity));
}

#[tokio::test]
async fn test_failed_sign_in_leaves_state_untouched() {
    let session = store(ScriptedAuth::new(Probe::Unauthorized));
    session.restore_session().await;

    let error = session.sign_in("d@example.org", "wrong").await.unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(error.server_message(), Some("Mot de passe incorrect"));
    assert_eq!(session.snapshot(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_logout_clears_identity() {
    let identity = Identity::new("123", Role::Patient, "p@example.org");
    let session = store(ScriptedAuth::new(Probe::Identity(identity)));
    session.restore_session().await;

    session.logout().await.unwrap();

    assert_eq!(session.snapshot(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_logout_reaches_anonymous_even_when_backend_fails() {
    let identity = Identity::new("123", Role::Patient, "p@example.org");
    let auth = Arc::new(ScriptedAuth::new(Probe::Identity(identity)).failing_logout());
    let session = SessionStore::new(auth.clone() as AuthGatewayState);
    session.restore_session().await;

    let result = session.logout().await;

    assert!(result.is_err(), "the failed notification is still reported");
    assert_eq!(session.current_identity(), None);
    assert!(!session.is_loading());
    assert_eq!(auth.logout_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_navigator_logout_goes_home_and_reports_backend_failure() {
    let identity = Identity::new("10", Role::Dietitian, "d@example.org");
    let auth = Arc::new(ScriptedAuth::new(Probe::Identity(identity)).failing_logout());
    let config = AppConfig::default();
    let api = ApiClient::new(&config).unwrap();
    let state = AppState::with_auth_gateway(config, api, auth as AuthGatewayState);
    state.session.restore_session().await;
    let navigator = Navigator::new(state);

    let (page, notified) = navigator.logout().await;

    assert_eq!(page.route(), Some(&Route::Home));
    assert_eq!(notified.unwrap_err().status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(navigator.state().session.current_identity(), None);
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let session = store(ScriptedAuth::new(Probe::Unauthorized));
    let mut changes = session.subscribe();

    session.restore_session().await;
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow_and_update(), SessionState::Anonymous);

    session.login(Identity::new("5", Role::Nurse, "n@example.org"));
    changes.changed().await.unwrap();
    assert!(matches!(&*changes.borrow(), SessionState::Authenticated(identity) if identity.subject_id == "5"));
}
