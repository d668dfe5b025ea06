//! User persistence port and application service.
//!
//! Owns the user lifecycle: creation with server-side registration
//! timestamping, phone-keyed lookup, patch-style updates and deletion.
//! Phone format validation always runs before the first store access.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use phonebook_core::{AppError, AppResult};
use phonebook_domain::{PhoneNumber, User, UserPatch};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Repository port for user persistence.
///
/// The store enforces phone number uniqueness and per-key atomicity; each
/// method maps to a single atomic store operation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by phone number.
    async fn find_by_phone_number(&self, phone_number: &PhoneNumber) -> AppResult<Option<User>>;

    /// Inserts a new user record. A duplicate phone number is a conflict.
    async fn insert(&self, user: &User) -> AppResult<()>;

    /// Updates the record stored under `original`, possibly re-keying it to
    /// the phone number carried by `user`.
    async fn update(&self, original: &PhoneNumber, user: &User) -> AppResult<()>;

    /// Deletes the record stored under the given phone number.
    async fn delete_by_phone_number(&self, phone_number: &PhoneNumber) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for creating a user record.
///
/// The registration time is not a parameter: it is stamped by the service at
/// creation and any client-supplied value is ignored.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique phone number for the new record.
    pub phone_number: PhoneNumber,
    /// Given name, if provided.
    pub first_name: Option<String>,
    /// Family name, if provided.
    pub second_name: Option<String>,
    /// Contact email, if provided.
    pub email: Option<String>,
    /// Postal address, if provided.
    pub address: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user records.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Creates a user record, stamping the registration time.
    ///
    /// Uniqueness is not pre-checked; a duplicate phone number surfaces as
    /// the store's conflict error.
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let user = User {
            phone_number: new_user.phone_number,
            first_name: new_user.first_name,
            second_name: new_user.second_name,
            email: new_user.email,
            address: new_user.address,
            registration_time: Utc::now(),
        };

        self.user_repository.insert(&user).await?;

        Ok(user)
    }

    /// Returns the user stored under the given phone number.
    pub async fn user_by_phone_number(&self, phone_number: &str) -> AppResult<User> {
        let phone_number = PhoneNumber::new(phone_number)?;

        self.find_user_or_not_found(&phone_number).await
    }

    /// Applies a sparse patch to the user stored under `phone_number`.
    ///
    /// Only present patch fields overwrite stored values. The persistence
    /// update stays keyed on the original phone number even when the patch
    /// re-keys the entity. Returns the updated record.
    pub async fn update(&self, phone_number: &str, patch: UserPatch) -> AppResult<User> {
        let original = PhoneNumber::new(phone_number)?;

        let mut user = self.find_user_or_not_found(&original).await?;
        tracing::info!(phone_number = %original, "found user for update");

        patch.apply(&mut user);
        tracing::info!(phone_number = %user.phone_number, "updating user");

        self.user_repository.update(&original, &user).await?;

        Ok(user)
    }

    /// Deletes the user stored under the given phone number.
    ///
    /// The lookup confirms existence only; the delete is a second,
    /// independent store access.
    pub async fn delete(&self, phone_number: &str) -> AppResult<()> {
        let phone_number = PhoneNumber::new(phone_number)?;

        self.find_user_or_not_found(&phone_number).await?;
        tracing::info!(%phone_number, "deleting user");

        self.user_repository
            .delete_by_phone_number(&phone_number)
            .await
    }

    async fn find_user_or_not_found(&self, phone_number: &PhoneNumber) -> AppResult<User> {
        self.user_repository
            .find_by_phone_number(phone_number)
            .await?
            .ok_or_else(|| AppError::NotFound(phone_number.to_string()))
    }
}
