/// Form Module Index
///
/// Edit forms validate locally before anything is sent. A form with
/// missing required fields never reaches the backend; a refused submission
/// carries the server's `.error` text when there is one. On success the
/// caller reloads the screen it came from.
use crate::error::{ApiError, FormError};

pub mod health;
pub mod login;
pub mod meal;
pub mod patient;

pub use health::HealthRecordForm;
pub use login::LoginForm;
pub use meal::{MealForm, MealLineInput};
pub use patient::PatientForm;

/// Names of the required fields whose check is `false`, in form order.
pub(crate) fn missing_fields(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

pub(crate) fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Maps a refused submission to the message the form displays.
pub(crate) fn rejected(error: ApiError, fallback: &str) -> FormError {
    tracing::warn!("form submission refused: {}", error);
    FormError::Rejected(error.user_message(fallback))
}
