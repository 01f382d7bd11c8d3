use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::Instrument;
use uuid::Uuid;

use crate::{config::AppConfig, error::ApiError};

/// Header used to correlate one client call with the backend's logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ApiClient
///
/// Thin HTTP plumbing shared by every gateway. It owns the cookie jar that
/// carries the backend session (the equivalent of `withCredentials`), so all
/// clones of one `ApiClient` share a session.
///
/// No caching, retries or batching: every call is one fresh round-trip.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // --- Typed helpers used by the gateways ---

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(Method::GET, path, |req| req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let body = self.execute(Method::GET, path, |req| req.query(query)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::POST, path, |req| req.json(payload)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST whose response body is ignored (acknowledgements, messages).
    pub(crate) async fn post_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: Option<&B>,
    ) -> Result<(), ApiError> {
        self.execute(Method::POST, path, |req| match payload {
            Some(payload) => req.json(payload),
            None => req,
        })
        .await
        .map(drop)
    }

    pub(crate) async fn put_ack<B: Serialize + ?Sized>(&self, path: &str, payload: &B) -> Result<(), ApiError> {
        self.execute(Method::PUT, path, |req| req.json(payload))
            .await
            .map(drop)
    }

    pub(crate) async fn delete<Q: Serialize + ?Sized>(&self, path: &str, query: Option<&Q>) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, |req| match query {
            Some(query) => req.query(query),
            None => req,
        })
        .await
        .map(drop)
    }

    /// execute
    ///
    /// Sends one request tagged with a fresh `x-request-id` and returns the
    /// raw body on a 2xx. Any other status becomes `ApiError::Status`, with
    /// the body's `.error` field captured when present.
    async fn execute<F>(&self, method: Method, path: &str, build: F) -> Result<String, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "api_request",
            method = %method,
            path = %path,
            req_id = %request_id,
        );

        async move {
            let request = build(
                self.http
                    .request(method, self.url(path))
                    .header(REQUEST_ID_HEADER, request_id.to_string()),
            );

            let response = request.send().await.map_err(|e| {
                tracing::error!("transport failure: {:?}", e);
                ApiError::Transport(e)
            })?;

            let status = response.status();
            let body = response.text().await?;

            if status.is_success() {
                tracing::debug!(status = status.as_u16(), "ok");
                Ok(body)
            } else {
                let error = ApiError::from_body(status, &body);
                tracing::debug!(status = status.as_u16(), error = %error, "backend refused request");
                Err(error)
            }
        }
        .instrument(span)
        .await
    }
}
