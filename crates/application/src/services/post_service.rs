use std::collections::HashMap;
use std::sync::Arc;

use domain::{
    DomainError, LikeToggle, Notification, NotificationId, NotificationKind, Post, PostId,
    UserId, UserSummary,
};
use uuid::Uuid;

use crate::{
    clock::Clock,
    dto::{CommentDto, PostDto, UserSummaryDto},
    error::ApplicationError,
    events::{EventEnvelope, EventPublisher, RealtimeEvent},
    media::{MediaStore, MediaUpload},
    repository::{NotificationRepository, PostRepository, UserRepository},
    services::index_summaries,
};

#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub author: UserId,
    pub description: String,
    pub image: Option<MediaUpload>,
}

pub struct PostServiceDependencies {
    pub post_repository: Arc<dyn PostRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub notification_repository: Arc<dyn NotificationRepository>,
    pub media_store: Arc<dyn MediaStore>,
    pub publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
}

/// 帖子互动服务：发帖、点赞切换、评论追加
pub struct PostService {
    deps: PostServiceDependencies,
}

impl PostService {
    pub fn new(deps: PostServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create(&self, request: CreatePostRequest) -> Result<PostDto, ApplicationError> {
        // 上传失败作为创建失败向上传播
        let image = match request.image {
            Some(upload) => Some(
                self.deps
                    .media_store
                    .store(upload)
                    .await
                    .map_err(|err| ApplicationError::media(err.to_string()))?,
            ),
            None => None,
        };

        let now = self.deps.clock.now();
        let post = Post::new(
            PostId::from(Uuid::new_v4()),
            request.author,
            request.description,
            image,
            now,
        );
        let stored = self.deps.post_repository.create(post).await?;

        self.project(&stored).await
    }

    /// 全部帖子，最新的在前，作者与评论者身份投影
    pub async fn feed(&self) -> Result<Vec<PostDto>, ApplicationError> {
        let posts = self.deps.post_repository.list_recent().await?;

        let mut ids: Vec<UserId> = Vec::new();
        for post in &posts {
            ids.push(post.author);
            ids.extend(post.comments.iter().map(|comment| comment.user));
        }
        ids.sort_unstable_by_key(|id| id.0);
        ids.dedup();

        let summaries = index_summaries(self.deps.user_repository.find_summaries(&ids).await?);

        posts
            .iter()
            .map(|post| Self::project_with(post, &summaries))
            .collect()
    }

    pub async fn toggle_like(
        &self,
        post_id: PostId,
        user: UserId,
    ) -> Result<PostDto, ApplicationError> {
        let mut post = self
            .deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        let now = self.deps.clock.now();
        let toggle = post.toggle_like(user);

        // 自己给自己的帖子点赞不产生通知
        if toggle == LikeToggle::Added && post.author != user {
            self.deps
                .notification_repository
                .create(Notification::new(
                    NotificationId::from(Uuid::new_v4()),
                    post.author,
                    NotificationKind::Like,
                    user,
                    Some(post_id),
                    now,
                ))
                .await?;
        }

        let stored = self.deps.post_repository.update(post).await?;

        // 点赞更新广播给所有在线通道，不按受众过滤
        self.broadcast(RealtimeEvent::LikeUpdated {
            post_id,
            likes: stored.likes.clone(),
        })
        .await;

        self.project(&stored).await
    }

    pub async fn add_comment(
        &self,
        post_id: PostId,
        user: UserId,
        content: String,
    ) -> Result<PostDto, ApplicationError> {
        let mut post = self
            .deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        let now = self.deps.clock.now();
        post.add_comment(user, content, now);

        if post.author != user {
            self.deps
                .notification_repository
                .create(Notification::new(
                    NotificationId::from(Uuid::new_v4()),
                    post.author,
                    NotificationKind::Comment,
                    user,
                    Some(post_id),
                    now,
                ))
                .await?;
        }

        let stored = self.deps.post_repository.update(post).await?;
        let dto = self.project(&stored).await?;

        self.broadcast(RealtimeEvent::CommentAdded {
            post_id,
            comments: dto.comments.clone(),
        })
        .await;

        Ok(dto)
    }

    async fn project(&self, post: &Post) -> Result<PostDto, ApplicationError> {
        let mut ids: Vec<UserId> = vec![post.author];
        ids.extend(post.comments.iter().map(|comment| comment.user));
        ids.sort_unstable_by_key(|id| id.0);
        ids.dedup();

        let summaries = index_summaries(self.deps.user_repository.find_summaries(&ids).await?);
        Self::project_with(post, &summaries)
    }

    fn project_with(
        post: &Post,
        summaries: &HashMap<UserId, UserSummary>,
    ) -> Result<PostDto, ApplicationError> {
        let author = summaries
            .get(&post.author)
            .ok_or(DomainError::UserNotFound)?;

        let comments = post
            .comments
            .iter()
            .map(|comment| {
                let user = summaries
                    .get(&comment.user)
                    .ok_or(DomainError::UserNotFound)?;
                Ok(CommentDto::project(comment, user))
            })
            .collect::<Result<Vec<_>, ApplicationError>>()?;

        Ok(PostDto {
            id: post.id,
            author: UserSummaryDto::from(author),
            description: post.description.clone(),
            image: post.image.clone(),
            likes: post.likes.clone(),
            comments,
            created_at: post.created_at,
        })
    }

    async fn broadcast(&self, event: RealtimeEvent) {
        if let Err(err) = self
            .deps
            .publisher
            .publish(EventEnvelope::broadcast(event))
            .await
        {
            tracing::warn!(error = %err, "互动事件广播失败");
        }
    }
}
