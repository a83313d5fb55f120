use async_trait::async_trait;
use domain::{
    ConnectionRequest, Notification, Post, PostId, RepositoryError, RequestId, User, UserId,
    UserSummary,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    /// 将 peer 加入 user 的连接集合，已存在时为 no-op
    async fn add_connection(&self, user: UserId, peer: UserId) -> Result<(), RepositoryError>;
    /// 将 peer 从 user 的连接集合移除，不存在时为 no-op
    async fn remove_connection(&self, user: UserId, peer: UserId) -> Result<(), RepositoryError>;
    async fn find_summary(&self, id: UserId) -> Result<Option<UserSummary>, RepositoryError>;
    async fn find_summaries(&self, ids: &[UserId]) -> Result<Vec<UserSummary>, RepositoryError>;
}

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 创建请求。同一 (sender, receiver) 已有 pending 行时必须返回
    /// `RepositoryError::Conflict`（由存储层唯一约束保证）。
    async fn create(
        &self,
        request: ConnectionRequest,
    ) -> Result<ConnectionRequest, RepositoryError>;
    async fn update(
        &self,
        request: ConnectionRequest,
    ) -> Result<ConnectionRequest, RepositoryError>;
    async fn find_by_id(&self, id: RequestId)
        -> Result<Option<ConnectionRequest>, RepositoryError>;
    /// sender -> receiver 方向的 pending 请求
    async fn find_pending(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError>;
    /// 任一方向的 pending 请求，用于关系状态查询
    async fn find_pending_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError>;
    async fn list_pending_for(
        &self,
        receiver: UserId,
    ) -> Result<Vec<ConnectionRequest>, RepositoryError>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, RepositoryError>;
    async fn update(&self, post: Post) -> Result<Post, RepositoryError>;
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError>;
    /// 全部帖子，最新的在前
    async fn list_recent(&self) -> Result<Vec<Post>, RepositoryError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification, RepositoryError>;
    /// 用户的通知，最新的在前
    async fn list_for(&self, receiver: UserId) -> Result<Vec<Notification>, RepositoryError>;
    async fn mark_all_read(&self, receiver: UserId) -> Result<u64, RepositoryError>;
}
