use std::sync::Arc;

use domain::{
    ConnectionRequest, DomainError, RelationState, RepositoryError, RequestId, UserId,
};
use uuid::Uuid;

use crate::{
    clock::Clock,
    dto::{ConnectionRequestDto, PendingRequestDto, RelationDto, UserSummaryDto},
    error::ApplicationError,
    events::{EventEnvelope, EventPublisher, RealtimeEvent},
    presence::PresenceRegistry,
    repository::{ConnectionRepository, NotificationRepository, UserRepository},
    services::index_summaries,
};

pub struct ConnectionServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub connection_repository: Arc<dyn ConnectionRepository>,
    pub notification_repository: Arc<dyn NotificationRepository>,
    pub presence: Arc<dyn PresenceRegistry>,
    pub publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
}

/// 连接生命周期服务
///
/// 发送、接受、拒绝、查询和移除两个用户之间的双向连接关系，
/// 并在状态变化时向双方的在线通道推送定向事件。
pub struct ConnectionService {
    deps: ConnectionServiceDependencies,
}

impl ConnectionService {
    pub fn new(deps: ConnectionServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn send(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<ConnectionRequestDto, ApplicationError> {
        if sender == receiver {
            return Err(DomainError::SelfRequest.into());
        }

        let sender_user = self
            .deps
            .user_repository
            .find_by_id(sender)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        if sender_user.is_connected_to(receiver) {
            return Err(DomainError::AlreadyConnected.into());
        }

        if self
            .deps
            .connection_repository
            .find_pending(sender, receiver)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateRequest.into());
        }

        let now = self.deps.clock.now();
        let request = ConnectionRequest::new(RequestId::from(Uuid::new_v4()), sender, receiver, now);
        // 读检查无法杜绝并发的重复创建，存储层唯一约束兜底
        let stored = match self.deps.connection_repository.create(request).await {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(DomainError::DuplicateRequest.into()),
            Err(err) => return Err(err.into()),
        };

        self.emit_status(receiver, sender, "received").await;
        self.emit_status(sender, receiver, "pending").await;

        Ok(ConnectionRequestDto::from(&stored))
    }

    pub async fn accept(
        &self,
        request_id: RequestId,
        actor: UserId,
    ) -> Result<(), ApplicationError> {
        let mut request = self
            .deps
            .connection_repository
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::RequestNotFound)?;

        let now = self.deps.clock.now();
        request.accept(actor, now)?;
        self.deps.connection_repository.update(request.clone()).await?;

        // 双向加入连接集合，集合语义保证重复 accept 也不会产生重复项
        self.deps
            .user_repository
            .add_connection(actor, request.sender)
            .await?;
        self.deps
            .user_repository
            .add_connection(request.sender, actor)
            .await?;

        self.deps
            .notification_repository
            .create(domain::Notification::new(
                domain::NotificationId::from(Uuid::new_v4()),
                request.sender,
                domain::NotificationKind::ConnectionAccepted,
                actor,
                None,
                now,
            ))
            .await?;

        self.emit_status(actor, request.sender, "connected").await;
        self.emit_status(request.sender, actor, "connected").await;

        Ok(())
    }

    pub async fn reject(
        &self,
        request_id: RequestId,
        actor: UserId,
    ) -> Result<(), ApplicationError> {
        let mut request = self
            .deps
            .connection_repository
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::RequestNotFound)?;

        let now = self.deps.clock.now();
        request.reject(actor, now)?;
        self.deps.connection_repository.update(request.clone()).await?;

        self.deps
            .notification_repository
            .create(domain::Notification::new(
                domain::NotificationId::from(Uuid::new_v4()),
                request.sender,
                domain::NotificationKind::ConnectionRejected,
                actor,
                None,
                now,
            ))
            .await?;

        Ok(())
    }

    /// 当前用户与目标用户的关系状态
    pub async fn relation(
        &self,
        current: UserId,
        target: UserId,
    ) -> Result<RelationDto, ApplicationError> {
        let current_user = self
            .deps
            .user_repository
            .find_by_id(current)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if current_user.is_connected_to(target) {
            return Ok(RelationDto::from(&RelationState::Connected));
        }

        let state = match self
            .deps
            .connection_repository
            .find_pending_between(current, target)
            .await?
        {
            Some(request) if request.sender == current => RelationState::Pending,
            Some(request) => RelationState::Received {
                request_id: request.id,
            },
            None => RelationState::None,
        };

        Ok(RelationDto::from(&state))
    }

    /// 无条件移除双向连接，不存在时也是成功
    pub async fn remove(&self, current: UserId, target: UserId) -> Result<(), ApplicationError> {
        self.deps
            .user_repository
            .remove_connection(current, target)
            .await?;
        self.deps
            .user_repository
            .remove_connection(target, current)
            .await?;

        self.emit_status(target, current, "connect").await;
        self.emit_status(current, target, "connect").await;

        Ok(())
    }

    /// 当前用户收到的所有 pending 请求，附带发送者身份投影
    pub async fn pending_incoming(
        &self,
        user: UserId,
    ) -> Result<Vec<PendingRequestDto>, ApplicationError> {
        let requests = self.deps.connection_repository.list_pending_for(user).await?;
        let sender_ids: Vec<UserId> = requests.iter().map(|request| request.sender).collect();
        let summaries = index_summaries(
            self.deps
                .user_repository
                .find_summaries(&sender_ids)
                .await?,
        );

        requests
            .iter()
            .map(|request| {
                let sender = summaries
                    .get(&request.sender)
                    .ok_or(DomainError::UserNotFound)?;
                Ok(PendingRequestDto {
                    id: request.id,
                    sender: UserSummaryDto::from(sender),
                    created_at: request.created_at,
                })
            })
            .collect()
    }

    /// 当前用户的连接列表，身份字段投影
    pub async fn connections(
        &self,
        user: UserId,
    ) -> Result<Vec<UserSummaryDto>, ApplicationError> {
        let current = self
            .deps
            .user_repository
            .find_by_id(user)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let summaries = self
            .deps
            .user_repository
            .find_summaries(&current.connections)
            .await?;

        Ok(summaries.iter().map(UserSummaryDto::from).collect())
    }

    /// 定向推送状态变化；目标不在线时静默跳过，不排队
    async fn emit_status(&self, to: UserId, updated_user: UserId, new_status: &str) {
        let Some(channel) = self.deps.presence.lookup(to).await else {
            return;
        };
        let envelope = EventEnvelope::to_channel(
            channel,
            RealtimeEvent::StatusUpdate {
                updated_user_id: updated_user,
                new_status: new_status.to_owned(),
            },
        );
        if let Err(err) = self.deps.publisher.publish(envelope).await {
            tracing::warn!(user_id = %to, error = %err, "状态事件推送失败");
        }
    }
}
