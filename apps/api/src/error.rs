use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use phonebook_core::AppError;
use serde::Serialize;
use validator::ValidationErrors;

/// API error payload, uniform for every error category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    pub timestamp_millis: i64,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        Self(AppError::Validation(field_errors_message(&value)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) | AppError::Malformed(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
            timestamp_millis: Utc::now().timestamp_millis(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Renders aggregated field validation failures as `"<field> - <reason>;"`
/// segments, one per violated constraint.
fn field_errors_message(errors: &ValidationErrors) -> String {
    let mut message = String::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors.iter() {
            let reason = error
                .message
                .as_deref()
                .unwrap_or_else(|| error.code.as_ref());
            message.push_str(field.as_ref());
            message.push_str(" - ");
            message.push_str(reason);
            message.push(';');
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct SampleRequest {
        #[validate(length(min = 1, message = "must not be empty"))]
        first_name: String,
        #[validate(email(message = "must be a valid email address"))]
        email: String,
    }

    fn response_status(error: AppError) -> StatusCode {
        ApiError(error).into_response().status()
    }

    #[test]
    fn status_mapping_follows_error_kind() {
        assert_eq!(
            response_status(AppError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            response_status(AppError::Malformed("unparsable".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            response_status(AppError::NotFound("+79219008833".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            response_status(AppError::Conflict("duplicate".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            response_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_body_uses_camel_case_timestamp_key() {
        let payload = ErrorResponse {
            message: "nope".to_owned(),
            timestamp_millis: 1_700_000_000_000,
        };

        let rendered = serde_json::to_string(&payload)
            .unwrap_or_else(|_| panic!("error payload must serialize"));
        assert!(rendered.contains("\"timestampMillis\":1700000000000"));
        assert!(rendered.contains("\"message\":\"nope\""));
    }

    #[test]
    fn field_errors_render_one_segment_per_violation() {
        let request = SampleRequest {
            first_name: String::new(),
            email: "not-an-email".to_owned(),
        };

        let Err(errors) = request.validate() else {
            panic!("sample request must fail validation");
        };

        let message = field_errors_message(&errors);
        assert_eq!(message.matches(';').count(), 2);
        assert!(message.contains("first_name - must not be empty;"));
        assert!(message.contains("email - must be a valid email address;"));
    }
}
