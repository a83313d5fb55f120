use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{RepositoryError, User, UserId, UserSummary};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use application::repository::UserRepository;

use super::map_sqlx_err;

#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    first_name: String,
    last_name: String,
    user_name: String,
    headline: Option<String>,
    profile_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SummaryRecord {
    id: Uuid,
    first_name: String,
    last_name: String,
    user_name: String,
    headline: Option<String>,
    profile_image: Option<String>,
}

impl From<SummaryRecord> for UserSummary {
    fn from(value: SummaryRecord) -> Self {
        UserSummary {
            id: UserId::from(value.id),
            first_name: value.first_name,
            last_name: value.last_name,
            user_name: value.user_name,
            headline: value.headline,
            profile_image: value.profile_image,
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, user_name, headline, profile_image, created_at, updated_at
            FROM users WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let Some(record) = record else {
            return Ok(None);
        };

        let peers: Vec<(Uuid,)> = sqlx::query_as(
            r#"SELECT peer_id FROM user_connections WHERE user_id = $1 ORDER BY created_at"#,
        )
        .bind(Uuid::from(id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Some(User {
            id: UserId::from(record.id),
            first_name: record.first_name,
            last_name: record.last_name,
            user_name: record.user_name,
            headline: record.headline,
            profile_image: record.profile_image,
            connections: peers.into_iter().map(|(peer,)| UserId::from(peer)).collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }))
    }

    async fn add_connection(&self, user: UserId, peer: UserId) -> Result<(), RepositoryError> {
        // ON CONFLICT DO NOTHING 给出集合语义：重复添加幂等
        sqlx::query(
            r#"
            INSERT INTO user_connections (user_id, peer_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, peer_id) DO NOTHING
            "#,
        )
        .bind(Uuid::from(user))
        .bind(Uuid::from(peer))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn remove_connection(&self, user: UserId, peer: UserId) -> Result<(), RepositoryError> {
        sqlx::query(r#"DELETE FROM user_connections WHERE user_id = $1 AND peer_id = $2"#)
            .bind(Uuid::from(user))
            .bind(Uuid::from(peer))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn find_summary(&self, id: UserId) -> Result<Option<UserSummary>, RepositoryError> {
        let record = sqlx::query_as::<_, SummaryRecord>(
            r#"
            SELECT id, first_name, last_name, user_name, headline, profile_image
            FROM users WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(UserSummary::from))
    }

    async fn find_summaries(&self, ids: &[UserId]) -> Result<Vec<UserSummary>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<Uuid> = ids.iter().copied().map(Uuid::from).collect();
        let records = sqlx::query_as::<_, SummaryRecord>(
            r#"
            SELECT id, first_name, last_name, user_name, headline, profile_image
            FROM users WHERE id = ANY($1)
            "#,
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(UserSummary::from).collect())
    }
}
