//! JSON extractor that validates the request body.
//!
//! Deserialization failures and validation failures are both reported as
//! 400 Bad Request; validation failures carry field-level details.

use encore_core::{ErrorResponse, FieldError};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::responses::ApiResponse;

/// JSON extractor that runs [`Validate`] on the deserialized value.
///
/// ```ignore
/// async fn update(ValidatedJson(request): ValidatedJson<PluginActionRequest>) {
///     // request passed validation here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let error_response = match self {
            Self::JsonError(rejection) => ErrorResponse {
                code: "INVALID_JSON".to_string(),
                message: format!("Invalid JSON: {rejection}"),
                details: None,
                trace_id: None,
            },
            Self::ValidationError(errors) => ErrorResponse {
                code: "VALIDATION_ERROR".to_string(),
                message: "Request validation failed".to_string(),
                details: Some(convert_validation_errors(&errors)),
                trace_id: None,
            },
        };
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(error_response)),
        )
            .into_response()
    }
}

/// Flattens validator errors into field errors, nested fields dotted.
fn convert_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors = Vec::new();

    for (field, field_errs) in errors.field_errors() {
        for err in field_errs {
            let message = err
                .message
                .as_ref()
                .map_or_else(|| format!("Validation failed for field '{field}'"), ToString::to_string);

            field_errors.push(FieldError {
                field: field.to_string(),
                message,
                code: err.code.to_string(),
            });
        }
    }

    for (field, errors_kind) in &errors.0 {
        if let ValidationErrorsKind::Struct(nested) = errors_kind {
            for nested_err in convert_validation_errors(nested.as_ref()) {
                field_errors.push(FieldError {
                    field: format!("{}.{}", field, nested_err.field),
                    message: nested_err.message,
                    code: nested_err.code,
                });
            }
        }
    }

    field_errors
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct PathRequest {
        #[validate(required(message = "pluginId is required"), length(min = 1))]
        plugin_id: Option<String>,
        #[validate(length(min = 2, message = "Path is too short"))]
        path: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct NestedRequest {
        #[validate(nested)]
        inner: PathRequest,
    }

    #[test]
    fn test_required_field_message() {
        let req = PathRequest {
            plugin_id: None,
            path: "/photos".to_string(),
        };

        let errors = req.validate().unwrap_err();
        let field_errors = convert_validation_errors(&errors);

        assert_eq!(field_errors.len(), 1);
        assert_eq!(field_errors[0].field, "plugin_id");
        assert_eq!(field_errors[0].message, "pluginId is required");
    }

    #[test]
    fn test_nested_fields_are_dotted() {
        let req = NestedRequest {
            inner: PathRequest {
                plugin_id: Some("photos".to_string()),
                path: "/".to_string(),
            },
        };

        let field_errors = convert_validation_errors(&req.validate().unwrap_err());

        assert_eq!(field_errors.len(), 1);
        assert_eq!(field_errors[0].field, "inner.path");
        assert_eq!(field_errors[0].message, "Path is too short");
    }

    #[test]
    fn test_rejection_is_bad_request() {
        let errors = PathRequest {
            plugin_id: Some(String::new()),
            path: "/photos".to_string(),
        }
        .validate()
        .unwrap_err();

        let response = ValidatedJsonRejection::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
