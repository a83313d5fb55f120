use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Comment, Post, PostId, RepositoryError, UserId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use application::repository::PostRepository;

use super::map_sqlx_err;

#[derive(Debug, FromRow)]
struct PostRecord {
    id: Uuid,
    author: Uuid,
    description: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct LikeRecord {
    post_id: Uuid,
    user_id: Uuid,
}

#[derive(Debug, FromRow)]
struct CommentRecord {
    post_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

fn assemble(
    record: PostRecord,
    likes: Vec<UserId>,
    comments: Vec<Comment>,
) -> Post {
    Post {
        id: PostId::from(record.id),
        author: UserId::from(record.author),
        description: record.description,
        image: record.image,
        likes,
        comments,
        created_at: record.created_at,
    }
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 批量抓取一组帖子的点赞与评论，避免逐帖查询
    async fn load_engagement(
        &self,
        ids: &[Uuid],
    ) -> Result<(HashMap<Uuid, Vec<UserId>>, HashMap<Uuid, Vec<Comment>>), RepositoryError> {
        let mut likes: HashMap<Uuid, Vec<UserId>> = HashMap::new();
        let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        if ids.is_empty() {
            return Ok((likes, comments));
        }

        let like_records = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT post_id, user_id FROM post_likes
            WHERE post_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        for record in like_records {
            likes
                .entry(record.post_id)
                .or_default()
                .push(UserId::from(record.user_id));
        }

        let comment_records = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT post_id, user_id, content, created_at FROM post_comments
            WHERE post_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        for record in comment_records {
            comments.entry(record.post_id).or_default().push(Comment {
                user: UserId::from(record.user_id),
                content: record.content,
                created_at: record.created_at,
            });
        }

        Ok((likes, comments))
    }

    /// 在单个事务里重写点赞与评论，position 列保持追加顺序
    async fn write_engagement(&self, post: &Post) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        let post_id = Uuid::from(post.id);

        sqlx::query(r#"DELETE FROM post_likes WHERE post_id = $1"#)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        for (position, user) in post.likes.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO post_likes (post_id, user_id, position) VALUES ($1, $2, $3)"#,
            )
            .bind(post_id)
            .bind(Uuid::from(*user))
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        sqlx::query(r#"DELETE FROM post_comments WHERE post_id = $1"#)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        for (position, comment) in post.comments.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO post_comments (post_id, user_id, content, created_at, position)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(post_id)
            .bind(Uuid::from(comment.user))
            .bind(&comment.content)
            .bind(comment.created_at)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        tx.commit().await.map_err(map_sqlx_err)
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: Post) -> Result<Post, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author, description, image, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::from(post.id))
        .bind(Uuid::from(post.author))
        .bind(&post.description)
        .bind(&post.image)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if !post.likes.is_empty() || !post.comments.is_empty() {
            self.write_engagement(&post).await?;
        }

        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE posts SET description = $2, image = $3 WHERE id = $1"#,
        )
        .bind(Uuid::from(post.id))
        .bind(&post.description)
        .bind(&post.image)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.write_engagement(&post).await?;
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"SELECT id, author, description, image, created_at FROM posts WHERE id = $1"#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let Some(record) = record else {
            return Ok(None);
        };

        let (mut likes, mut comments) = self.load_engagement(&[record.id]).await?;
        let post = assemble(
            record,
            likes.remove(&Uuid::from(id)).unwrap_or_default(),
            comments.remove(&Uuid::from(id)).unwrap_or_default(),
        );
        Ok(Some(post))
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepositoryError> {
        let records = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, author, description, image, created_at
            FROM posts ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
        let (mut likes, mut comments) = self.load_engagement(&ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let post_likes = likes.remove(&record.id).unwrap_or_default();
                let post_comments = comments.remove(&record.id).unwrap_or_default();
                assemble(record, post_likes, post_comments)
            })
            .collect())
    }
}
