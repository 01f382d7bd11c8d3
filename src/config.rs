use std::{env, time::Duration};

/// AppConfig
///
/// Holds the client's entire configuration state. It is loaded once at
/// startup and shared read-only through `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the REST backend, without a trailing slash (e.g. https://localhost/api).
    pub api_base_url: String,
    // Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    // Accept self-signed certificates. Only ever true in Env::Local, where the
    // development proxy serves the API over a self-signed certificate.
    pub accept_invalid_certs: bool,
    // Runtime environment marker. Controls log format and the TLS relaxation above.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between the local development
/// proxy and a production backend.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_API_BASE_URL: &str = "https://localhost/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Default for AppConfig {
    /// default
    ///
    /// A non-panicking configuration for tests: points at the local
    /// development proxy.
    fn default() -> Self {
        Self {
            api_base_url: LOCAL_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: true,
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// Same as `default()` but aimed at `base_url`. Used by tests that spin up
    /// a mock backend on an ephemeral port.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// load
    ///
    /// Reads the configuration from environment variables, failing fast.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `API_BASE_URL` is missing, and in any
    /// environment when `API_TIMEOUT_SECS` is set but is not a number.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let request_timeout = env::var("API_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .expect("FATAL: API_TIMEOUT_SECS must be a whole number of seconds")
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        match env {
            Env::Local => Self {
                env: Env::Local,
                api_base_url: normalize_base_url(
                    env::var("API_BASE_URL").unwrap_or_else(|_| LOCAL_API_BASE_URL.to_string()),
                ),
                request_timeout,
                accept_invalid_certs: env::var("API_ACCEPT_INVALID_CERTS")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
            },
            Env::Production => Self {
                env: Env::Production,
                api_base_url: normalize_base_url(
                    env::var("API_BASE_URL").expect("FATAL: API_BASE_URL required in production"),
                ),
                request_timeout,
                // Never relaxed in production, whatever the environment says.
                accept_invalid_certs: false,
            },
        }
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
