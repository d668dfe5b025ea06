//! User entity and phone number validation rules.
//!
//! The phone number is the entity's store key; all lookups, updates and
//! deletes are keyed on it.

use chrono::{DateTime, Utc};
use phonebook_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Number of digits following the `+7` country prefix.
const PHONE_DIGIT_COUNT: usize = 10;

/// Validated phone number in the form `+7` followed by exactly ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a validated phone number.
    ///
    /// The value must match `+7` followed by exactly ten ASCII digits, with
    /// nothing before or after. Any mismatch is a validation error raised
    /// before any store access happens.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        let digits = value.strip_prefix("+7").ok_or_else(|| invalid_format(&value))?;

        if digits.len() != PHONE_DIGIT_COUNT || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid_format(&value));
        }

        Ok(Self(value))
    }

    /// Returns the validated phone number string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

fn invalid_format(value: &str) -> AppError {
    AppError::Validation(format!(
        "invalid phone number '{value}': expected format +7 followed by ten digits, e.g. +79219008833"
    ))
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique phone number acting as the store key.
    pub phone_number: PhoneNumber,
    /// Given name, if provided.
    pub first_name: Option<String>,
    /// Family name, if provided.
    pub second_name: Option<String>,
    /// Contact email, if provided.
    pub email: Option<String>,
    /// Postal address, if provided.
    pub address: Option<String>,
    /// Stamped once at creation, server-side; never mutated afterwards.
    pub registration_time: DateTime<Utc>,
}

/// Sparse update for a stored user.
///
/// `None` leaves the stored field untouched; a present value overwrites it.
/// A present `phone_number` re-keys the entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement phone number, re-keying the entity when present.
    pub phone_number: Option<PhoneNumber>,
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub second_name: Option<String>,
    /// Replacement contact email.
    pub email: Option<String>,
    /// Replacement postal address.
    pub address: Option<String>,
}

impl UserPatch {
    /// Applies the patch to a user, overwriting only present fields.
    ///
    /// The registration time is never part of a patch.
    pub fn apply(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(second_name) = &self.second_name {
            user.second_name = Some(second_name.clone());
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(address) = &self.address {
            user.address = Some(address.clone());
        }
        if let Some(phone_number) = &self.phone_number {
            user.phone_number = phone_number.clone();
        }
    }

    /// Returns `true` when the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none()
            && self.first_name.is_none()
            && self.second_name.is_none()
            && self.email.is_none()
            && self.address.is_none()
    }
}
