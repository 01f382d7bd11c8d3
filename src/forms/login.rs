use super::{filled, missing_fields};
use crate::{
    error::FormError,
    models::{Credentials, Identity},
    session::SessionStore,
};

/// Shown for any refused sign-in. The backend's reason is not surfaced so
/// the form does not reveal which of the two fields was wrong.
pub const LOGIN_FAILED: &str = "Identifiants incorrects ou problème réseau";

/// LoginForm
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<Credentials, FormError> {
        let missing = missing_fields(&[
            ("username", filled(&self.username)),
            ("password", !self.password.is_empty()),
        ]);
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        Ok(Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// submit
    ///
    /// Signs in through the session store. On success the session holds the
    /// returned identity; on failure it is left untouched.
    pub async fn submit(&self, session: &SessionStore) -> Result<Identity, FormError> {
        let credentials = self.validate()?;
        session
            .sign_in(&credentials.username, &credentials.password)
            .await
            .map_err(|_| FormError::Rejected(LOGIN_FAILED.to_string()))
    }
}
