use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ConnectionRequest, RepositoryError, RequestId, RequestStatus, UserId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use application::repository::ConnectionRepository;

use super::{invalid_data, map_sqlx_err};

#[derive(Debug, FromRow)]
struct RequestRecord {
    id: Uuid,
    sender: Uuid,
    receiver: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRecord> for ConnectionRequest {
    type Error = RepositoryError;

    fn try_from(value: RequestRecord) -> Result<Self, Self::Error> {
        let status =
            RequestStatus::parse(&value.status).map_err(|err| invalid_data(err.to_string()))?;

        Ok(ConnectionRequest {
            id: RequestId::from(value.id),
            sender: UserId::from(value.sender),
            receiver: UserId::from(value.receiver),
            status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgConnectionRepository {
    pool: PgPool,
}

impl PgConnectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionRepository for PgConnectionRepository {
    async fn create(
        &self,
        request: ConnectionRequest,
    ) -> Result<ConnectionRequest, RepositoryError> {
        // (sender, receiver) WHERE status = 'pending' 上的部分唯一索引
        // 把并发的重复创建压成 Conflict
        let record = sqlx::query_as::<_, RequestRecord>(
            r#"
            INSERT INTO connection_requests (id, sender, receiver, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, sender, receiver, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::from(request.id))
        .bind(Uuid::from(request.sender))
        .bind(Uuid::from(request.receiver))
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        ConnectionRequest::try_from(record)
    }

    async fn update(
        &self,
        request: ConnectionRequest,
    ) -> Result<ConnectionRequest, RepositoryError> {
        let record = sqlx::query_as::<_, RequestRecord>(
            r#"
            UPDATE connection_requests
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, sender, receiver, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::from(request.id))
        .bind(request.status.as_str())
        .bind(request.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        ConnectionRequest::try_from(record)
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError> {
        let record = sqlx::query_as::<_, RequestRecord>(
            r#"
            SELECT id, sender, receiver, status, created_at, updated_at
            FROM connection_requests WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(ConnectionRequest::try_from).transpose()
    }

    async fn find_pending(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError> {
        let record = sqlx::query_as::<_, RequestRecord>(
            r#"
            SELECT id, sender, receiver, status, created_at, updated_at
            FROM connection_requests
            WHERE sender = $1 AND receiver = $2 AND status = 'pending'
            "#,
        )
        .bind(Uuid::from(sender))
        .bind(Uuid::from(receiver))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(ConnectionRequest::try_from).transpose()
    }

    async fn find_pending_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError> {
        let record = sqlx::query_as::<_, RequestRecord>(
            r#"
            SELECT id, sender, receiver, status, created_at, updated_at
            FROM connection_requests
            WHERE status = 'pending'
              AND ((sender = $1 AND receiver = $2) OR (sender = $2 AND receiver = $1))
            LIMIT 1
            "#,
        )
        .bind(Uuid::from(a))
        .bind(Uuid::from(b))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(ConnectionRequest::try_from).transpose()
    }

    async fn list_pending_for(
        &self,
        receiver: UserId,
    ) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        let records = sqlx::query_as::<_, RequestRecord>(
            r#"
            SELECT id, sender, receiver, status, created_at, updated_at
            FROM connection_requests
            WHERE receiver = $1 AND status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
        .bind(Uuid::from(receiver))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records
            .into_iter()
            .map(ConnectionRequest::try_from)
            .collect()
    }
}
