use serde::Serialize;
use tokio::sync::watch;

use crate::{
    error::ApiError,
    gateways::AuthGatewayState,
    models::{Credentials, Identity},
};

/// SessionState
///
/// Lifecycle of the client session. `Unknown` only exists between startup
/// and the settlement of `restore_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "identity", rename_all = "snake_case")]
pub enum SessionState {
    Unknown,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// SessionStore
///
/// Holds the single active identity. One store exists per `AppState`; it is
/// handed to consumers explicitly rather than living in a global.
///
/// Transitions: `restore_session` (Unknown → Authenticated | Anonymous),
/// `login` (→ Authenticated), `logout` (→ Anonymous). Consumers read with
/// `current_identity` / `is_loading` or observe changes via `subscribe`.
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    gateway: AuthGatewayState,
}

impl SessionStore {
    pub fn new(gateway: AuthGatewayState) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { state, gateway }
    }

    /// restore_session
    ///
    /// Probes the backend for an existing session. Fail-closed: a 401 and
    /// any other failure both settle to `Anonymous`. The result is applied
    /// only while the state is still `Unknown`, so an explicit `login` that
    /// lands first is never overwritten by a late probe.
    pub async fn restore_session(&self) {
        let settled = match self.gateway.check_session().await {
            Ok(Some(identity)) => SessionState::Authenticated(identity),
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                tracing::warn!("session probe failed, continuing as anonymous: {}", e);
                SessionState::Anonymous
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if *state == SessionState::Unknown {
                *state = settled.clone();
                true
            } else {
                false
            }
        });

        if applied {
            match &settled {
                SessionState::Authenticated(identity) => tracing::info!(
                    subject = %identity.subject_id,
                    role = ?identity.role,
                    "session restored"
                ),
                _ => tracing::info!("no existing session"),
            }
        } else {
            tracing::debug!("session already settled, ignoring restore result");
        }
    }

    /// Adopts an identity obtained from a successful credential exchange.
    pub fn login(&self, identity: Identity) {
        tracing::info!(
            subject = %identity.subject_id,
            role = ?identity.role,
            "signed in"
        );
        self.state.send_replace(SessionState::Authenticated(identity));
    }

    /// sign_in
    ///
    /// Exchanges credentials with the backend and adopts the returned
    /// identity. On failure the session is left as it was.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let identity = self.gateway.login(&credentials).await.map_err(|e| {
            tracing::info!(username = %username, "sign-in refused: {}", e);
            e
        })?;

        self.login(identity.clone());
        Ok(identity)
    }

    /// logout
    ///
    /// Notifies the backend, then moves to `Anonymous` whatever the outcome.
    /// A failed notification is logged and returned so callers can surface
    /// it; the local transition has already happened.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let notified = self.gateway.logout().await;
        self.state.send_replace(SessionState::Anonymous);

        match notified {
            Ok(()) => {
                tracing::info!("signed out");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("signed out locally, backend logout failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn is_loading(&self) -> bool {
        *self.state.borrow() == SessionState::Unknown
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
