//! Transport DTOs for the user HTTP surface.
//!
//! Wire field names are camelCase, matching the JSON contract. Conversions
//! to and from domain types are explicit so the field list here is
//! authoritative.

use chrono::{DateTime, Utc};
use phonebook_domain::{PhoneNumber, User, UserPatch};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body of `POST /users`.
///
/// The registration time is intentionally absent: it is stamped server-side
/// and any client-supplied value would be ignored anyway.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub second_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub address: Option<String>,
}

/// Sparse body of `PATCH /users/{phone_number}`.
///
/// Absent fields leave the stored values untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub second_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub address: Option<String>,
}

impl UpdateUserRequest {
    /// Converts the request into a domain patch.
    ///
    /// Runs after `validate()`, so the phone number conversion cannot fail
    /// in practice; the error path still propagates rather than panics.
    pub fn into_patch(self) -> phonebook_core::AppResult<UserPatch> {
        let phone_number = self.phone_number.map(PhoneNumber::new).transpose()?;

        Ok(UserPatch {
            phone_number,
            first_name: self.first_name,
            second_name: self.second_name,
            email: self.email,
            address: self.address,
        })
    }
}

/// User payload returned by every successful read or write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub phone_number: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub registration_time: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            phone_number: user.phone_number.into(),
            first_name: user.first_name,
            second_name: user.second_name,
            email: user.email,
            address: user.address,
            registration_time: user.registration_time,
        }
    }
}

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if PhoneNumber::new(phone_number).is_err() {
        return Err(ValidationError::new("invalid_phone_number")
            .with_message("must match +7 followed by ten digits, e.g. +79219008833".into()));
    }

    Ok(())
}
