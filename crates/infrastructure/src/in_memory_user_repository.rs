//! In-memory user repository for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use phonebook_application::UserRepository;
use phonebook_core::{AppError, AppResult};
use phonebook_domain::{PhoneNumber, User};

/// In-memory user repository implementation.
///
/// Same contract as the Postgres adapter: unique phone numbers, atomic
/// per-key mutations.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_phone_number(&self, phone_number: &PhoneNumber) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(phone_number.as_str()).cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;

        if users.contains_key(user.phone_number.as_str()) {
            return Err(AppError::Conflict(
                "a user with this phone number already exists".to_owned(),
            ));
        }

        users.insert(user.phone_number.as_str().to_owned(), user.clone());
        Ok(())
    }

    async fn update(&self, original: &PhoneNumber, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;

        if !users.contains_key(original.as_str()) {
            return Err(AppError::NotFound(original.to_string()));
        }

        if original != &user.phone_number && users.contains_key(user.phone_number.as_str()) {
            return Err(AppError::Conflict(
                "a user with this phone number already exists".to_owned(),
            ));
        }

        users.remove(original.as_str());
        users.insert(user.phone_number.as_str().to_owned(), user.clone());
        Ok(())
    }

    async fn delete_by_phone_number(&self, phone_number: &PhoneNumber) -> AppResult<()> {
        self.users.write().await.remove(phone_number.as_str());
        Ok(())
    }
}
