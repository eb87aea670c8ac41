//! JSON body extractors that report failures as `AppError`.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that runs `validator` rules after deserializing.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_category(ValidatedJson(payload): ValidatedJson<NewCategory>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Plain JSON body for payloads that validate themselves (partial updates).
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    // field_errors is a HashMap
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewReview, RegisterUser};

    #[test]
    fn test_messages_come_from_rules() {
        let review = NewReview {
            order_id: 1,
            rating: 9,
            comment: None,
        };
        let errors = review.validate().unwrap_err();
        assert_eq!(format_validation_errors(&errors), "Rating must be between 1 and 5");
    }

    #[test]
    fn test_multiple_failures_are_joined() {
        let data: RegisterUser = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "password": "pw",
            "role": "customer",
            "first_name": "",
            "last_name": "Doe"
        }))
        .unwrap();
        let message = format_validation_errors(&data.validate().unwrap_err());
        assert_eq!(message, "First name is required, Invalid email address");
    }
}
