use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    api::ApiClient,
    error::ApiError,
    models::{Credentials, Identity},
};

/// AuthGateway
///
/// Contract for the three session endpoints. The `SessionStore` depends on
/// this trait rather than on HTTP so tests can inject scripted backends.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Probes `GET /session`. `Ok(None)` means the backend answered 401
    /// (no session); every other failure is returned as an error.
    async fn check_session(&self) -> Result<Option<Identity>, ApiError>;

    /// Credential exchange (`POST /login`).
    async fn login(&self, credentials: &Credentials) -> Result<Identity, ApiError>;

    /// Notifies the backend (`POST /logout`).
    async fn logout(&self) -> Result<(), ApiError>;
}

/// AuthGatewayState
///
/// Shared handle used by the session store.
pub type AuthGatewayState = Arc<dyn AuthGateway>;

/// HttpAuthGateway
///
/// The real implementation backed by the REST API.
#[derive(Clone, Debug)]
pub struct HttpAuthGateway {
    api: ApiClient,
}

impl HttpAuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn check_session(&self) -> Result<Option<Identity>, ApiError> {
        match self.api.get_json::<Identity>("/session").await {
            Ok(identity) => Ok(Some(identity)),
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<Identity, ApiError> {
        self.api.post_json("/login", credentials).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.api.post_ack::<()>("/logout", None).await
    }
}
