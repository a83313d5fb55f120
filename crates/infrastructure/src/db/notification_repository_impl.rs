use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Notification, NotificationId, NotificationKind, PostId, RepositoryError, UserId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use application::repository::NotificationRepository;

use super::{invalid_data, map_sqlx_err};

#[derive(Debug, FromRow)]
struct NotificationRecord {
    id: Uuid,
    receiver: Uuid,
    kind: String,
    related_user: Uuid,
    related_post: Option<Uuid>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRecord> for Notification {
    type Error = RepositoryError;

    fn try_from(value: NotificationRecord) -> Result<Self, Self::Error> {
        let kind =
            NotificationKind::parse(&value.kind).map_err(|err| invalid_data(err.to_string()))?;

        Ok(Notification {
            id: NotificationId::from(value.id),
            receiver: UserId::from(value.receiver),
            kind,
            related_user: UserId::from(value.related_user),
            related_post: value.related_post.map(PostId::from),
            is_read: value.is_read,
            created_at: value.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, RepositoryError> {
        let record = sqlx::query_as::<_, NotificationRecord>(
            r#"
            INSERT INTO notifications (id, receiver, kind, related_user, related_post, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, receiver, kind, related_user, related_post, is_read, created_at
            "#,
        )
        .bind(Uuid::from(notification.id))
        .bind(Uuid::from(notification.receiver))
        .bind(notification.kind.as_str())
        .bind(Uuid::from(notification.related_user))
        .bind(notification.related_post.map(Uuid::from))
        .bind(notification.is_read)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Notification::try_from(record)
    }

    async fn list_for(&self, receiver: UserId) -> Result<Vec<Notification>, RepositoryError> {
        let records = sqlx::query_as::<_, NotificationRecord>(
            r#"
            SELECT id, receiver, kind, related_user, related_post, is_read, created_at
            FROM notifications
            WHERE receiver = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(Uuid::from(receiver))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_all_read(&self, receiver: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE notifications SET is_read = TRUE WHERE receiver = $1 AND is_read = FALSE"#,
        )
        .bind(Uuid::from(receiver))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}
