use domain::RepositoryError;
use sqlx::{postgres::PgPoolOptions, PgPool};

mod connection_repository_impl;
mod notification_repository_impl;
mod post_repository_impl;
mod user_repository_impl;

pub use connection_repository_impl::PgConnectionRepository;
pub use notification_repository_impl::PgNotificationRepository;
pub use post_repository_impl::PgPostRepository;
pub use user_repository_impl::PgUserRepository;

pub async fn create_pg_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub(crate) fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        _ => RepositoryError::storage(err.to_string()),
    }
}

pub(crate) fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}
