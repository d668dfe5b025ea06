//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use phonebook_application::UserRepository;
use phonebook_core::{AppError, AppResult};
use phonebook_domain::{PhoneNumber, User};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    phone_number: String,
    first_name: Option<String>,
    second_name: Option<String>,
    email: Option<String>,
    address: Option<String>,
    registration_time: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        // Stored keys are written through PhoneNumber, so a mismatch here
        // means the table was modified out of band.
        let phone_number = PhoneNumber::new(row.phone_number).map_err(|error| {
            AppError::Internal(format!("stored phone number is invalid: {error}"))
        })?;

        Ok(Self {
            phone_number,
            first_name: row.first_name,
            second_name: row.second_name,
            email: row.email,
            address: row.address,
            registration_time: row.registration_time,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_phone_number(&self, phone_number: &PhoneNumber) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT phone_number, first_name, second_name, email, address, registration_time
            FROM users
            WHERE phone_number = $1
            LIMIT 1
            "#,
        )
        .bind(phone_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find user by phone number: {error}"))
        })?;

        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (phone_number, first_name, second_name, email, address, registration_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.phone_number.as_str())
        .bind(user.first_name.as_deref())
        .bind(user.second_name.as_deref())
        .bind(user.email.as_deref())
        .bind(user.address.as_deref())
        .bind(user.registration_time)
        .execute(&self.pool)
        .await
        .map_err(|error| phone_conflict_or_internal(error, "insert user"))?;

        Ok(())
    }

    async fn update(&self, original: &PhoneNumber, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET phone_number = $2,
                first_name = $3,
                second_name = $4,
                email = $5,
                address = $6
            WHERE phone_number = $1
            "#,
        )
        .bind(original.as_str())
        .bind(user.phone_number.as_str())
        .bind(user.first_name.as_deref())
        .bind(user.second_name.as_deref())
        .bind(user.email.as_deref())
        .bind(user.address.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| phone_conflict_or_internal(error, "update user"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(original.to_string()));
        }

        Ok(())
    }

    async fn delete_by_phone_number(&self, phone_number: &PhoneNumber) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE phone_number = $1")
            .bind(phone_number.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        Ok(())
    }
}

fn phone_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a user with this phone number already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
