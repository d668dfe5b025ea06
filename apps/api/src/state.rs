use phonebook_application::UserService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub postgres_pool: PgPool,
}
