use std::sync::Arc;

// --- Module Structure ---

// Transport and backend access.
pub mod api;
pub mod gateways;

// Core client services and components.
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod session;

// Navigation: route table and guard, screen loaders, edit forms.
pub mod forms;
pub mod navigator;
pub mod routes;
pub mod screens;

// --- Public Re-exports ---

// Makes core state types easily accessible to the entry point (main.rs) and tests.
pub use api::ApiClient;
pub use config::AppConfig;
pub use error::{ApiError, FormError};
pub use gateways::{AuthGateway, AuthGatewayState, Gateways, HttpAuthGateway};
pub use navigator::{Navigator, Page};
pub use policy::Role;
pub use routes::Route;
pub use session::{SessionState, SessionStore};

/// AppState
///
/// The single container holding the client's services and configuration.
/// It replaces any global session: everything that needs the session or the
/// backend receives it from here. Cloning shares the same session store and
/// HTTP cookie jar.
#[derive(Clone)]
pub struct AppState {
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
    /// Session Layer: the one active identity and its lifecycle.
    pub session: Arc<SessionStore>,
    /// Resource Layer: one gateway per entity family.
    pub gateways: Gateways,
}

impl AppState {
    /// new
    ///
    /// Wires the real HTTP stack: one `ApiClient` shared by the auth gateway
    /// and every resource gateway, so they all carry the same session cookie.
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        let auth = Arc::new(HttpAuthGateway::new(api.clone())) as AuthGatewayState;
        Ok(Self::with_auth_gateway(config, api, auth))
    }

    /// with_auth_gateway
    ///
    /// Same wiring with an injected auth gateway. Tests use it to script the
    /// session endpoints.
    pub fn with_auth_gateway(config: AppConfig, api: ApiClient, auth: AuthGatewayState) -> Self {
        Self {
            config,
            session: Arc::new(SessionStore::new(auth)),
            gateways: Gateways::new(api),
        }
    }
}
