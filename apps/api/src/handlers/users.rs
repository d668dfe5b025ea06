use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use phonebook_application::NewUser;
use phonebook_domain::PhoneNumber;

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /users - create a user record.
pub async fn create_user_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    payload.validate().map_err(ApiError::from)?;

    let phone_number = PhoneNumber::new(payload.phone_number.as_str())?;
    let new_user = NewUser {
        phone_number,
        first_name: payload.first_name,
        second_name: payload.second_name,
        email: payload.email,
        address: payload.address,
    };

    let user = state.user_service.create(new_user).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users/{phone_number} - read a user record.
pub async fn user_by_phone_number_handler(
    State(state): State<AppState>,
    Path(phone_number): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.user_by_phone_number(&phone_number).await?;

    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/{phone_number} - apply a sparse update.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(phone_number): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    payload.validate().map_err(ApiError::from)?;

    let patch = payload.into_patch()?;
    let user = state.user_service.update(&phone_number, patch).await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/{phone_number} - delete a user record.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(phone_number): Path<String>,
) -> ApiResult<StatusCode> {
    state.user_service.delete(&phone_number).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::response::IntoResponse;
    use phonebook_application::UserService;
    use phonebook_infrastructure::InMemoryUserRepository;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn test_state() -> AppState {
        // The pool is lazy and never connected; handler tests exercise the
        // in-memory repository only.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/phonebook_test")
            .unwrap_or_else(|_| panic!("lazy pool must construct"));

        AppState {
            user_service: UserService::new(Arc::new(InMemoryUserRepository::new())),
            postgres_pool: pool,
        }
    }

    fn create_request(phone_number: &str) -> CreateUserRequest {
        CreateUserRequest {
            phone_number: phone_number.to_owned(),
            first_name: Some("Ann".to_owned()),
            second_name: None,
            email: Some("ann@example.com".to_owned()),
            address: None,
        }
    }

    async fn error_body(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|_| panic!("error body must be readable"));
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| panic!("error body must be JSON"));
        (status, value)
    }

    #[tokio::test]
    async fn create_returns_created_user_with_registration_time() {
        let state = test_state();

        let result =
            create_user_handler(State(state), ApiJson(create_request("+79219008833"))).await;

        let Ok((status, Json(body))) = result else {
            panic!("valid create must succeed");
        };
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.phone_number, "+79219008833");
        assert_eq!(body.first_name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn create_with_three_violations_aggregates_field_messages() {
        let state = test_state();
        let payload = CreateUserRequest {
            phone_number: "12345".to_owned(),
            first_name: Some(String::new()),
            second_name: None,
            email: Some("not-an-email".to_owned()),
            address: None,
        };

        let result = create_user_handler(State(state), ApiJson(payload)).await;
        let Err(error) = result else {
            panic!("invalid create must fail");
        };

        let (status, body) = error_body(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let message = body["message"].as_str().unwrap_or_default();
        assert_eq!(message.matches(';').count(), 3);
        assert!(message.contains(" - "));
        assert!(body["timestampMillis"].is_i64());
    }

    #[tokio::test]
    async fn create_then_read_round_trip() {
        let state = test_state();
        let created =
            create_user_handler(State(state.clone()), ApiJson(create_request("+79219008833")))
                .await;
        assert!(created.is_ok());

        let result =
            user_by_phone_number_handler(State(state), Path("+79219008833".to_owned())).await;

        let Ok(Json(body)) = result else {
            panic!("created user must be readable");
        };
        assert_eq!(body.phone_number, "+79219008833");
        assert_eq!(body.first_name.as_deref(), Some("Ann"));
        assert_eq!(body.email.as_deref(), Some("ann@example.com"));
    }

    #[tokio::test]
    async fn duplicate_create_maps_to_conflict() {
        let state = test_state();
        let first =
            create_user_handler(State(state.clone()), ApiJson(create_request("+79219008833")))
                .await;
        assert!(first.is_ok());

        let second =
            create_user_handler(State(state), ApiJson(create_request("+79219008833"))).await;
        let Err(error) = second else {
            panic!("duplicate create must fail");
        };

        let (status, _) = error_body(error).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn read_with_bad_format_maps_to_bad_request() {
        let state = test_state();

        let result = user_by_phone_number_handler(State(state), Path("89219008833".to_owned())).await;
        let Err(error) = result else {
            panic!("bad phone format must fail");
        };

        let (status, _) = error_body(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn read_of_absent_user_maps_to_not_found() {
        let state = test_state();

        let result =
            user_by_phone_number_handler(State(state), Path("+79219008833".to_owned())).await;
        let Err(error) = result else {
            panic!("absent user must fail");
        };

        let (status, body) = error_body(error).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(
            body["message"]
                .as_str()
                .unwrap_or_default()
                .contains("+79219008833")
        );
    }

    #[tokio::test]
    async fn patch_with_only_email_changes_only_email() {
        let state = test_state();
        let created =
            create_user_handler(State(state.clone()), ApiJson(create_request("+79219008833")))
                .await;
        assert!(created.is_ok());

        let payload = UpdateUserRequest {
            email: Some("updated@example.com".to_owned()),
            ..UpdateUserRequest::default()
        };
        let result = update_user_handler(
            State(state),
            Path("+79219008833".to_owned()),
            ApiJson(payload),
        )
        .await;

        let Ok(Json(body)) = result else {
            panic!("patch of existing user must succeed");
        };
        assert_eq!(body.email.as_deref(), Some("updated@example.com"));
        assert_eq!(body.first_name.as_deref(), Some("Ann"));
        assert_eq!(body.second_name, None);
    }

    #[tokio::test]
    async fn delete_then_read_maps_to_not_found() {
        let state = test_state();
        let created =
            create_user_handler(State(state.clone()), ApiJson(create_request("+79219008833")))
                .await;
        assert!(created.is_ok());

        let deleted =
            delete_user_handler(State(state.clone()), Path("+79219008833".to_owned())).await;
        let Ok(status) = deleted else {
            panic!("delete of existing user must succeed");
        };
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result =
            user_by_phone_number_handler(State(state), Path("+79219008833".to_owned())).await;
        let Err(error) = result else {
            panic!("deleted user must not be readable");
        };
        let (status, _) = error_body(error).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
