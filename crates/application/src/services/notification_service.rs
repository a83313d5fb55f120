use std::sync::Arc;

use domain::{DomainError, UserId};

use crate::{
    dto::NotificationDto,
    error::ApplicationError,
    repository::{NotificationRepository, UserRepository},
    services::index_summaries,
};

pub struct NotificationServiceDependencies {
    pub notification_repository: Arc<dyn NotificationRepository>,
    pub user_repository: Arc<dyn UserRepository>,
}

/// 通知读取侧：通知本身由其他服务作为副作用写入
pub struct NotificationService {
    deps: NotificationServiceDependencies,
}

impl NotificationService {
    pub fn new(deps: NotificationServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn feed(&self, user: UserId) -> Result<Vec<NotificationDto>, ApplicationError> {
        let notifications = self.deps.notification_repository.list_for(user).await?;

        let related_ids: Vec<UserId> = notifications
            .iter()
            .map(|notification| notification.related_user)
            .collect();
        let summaries = index_summaries(
            self.deps
                .user_repository
                .find_summaries(&related_ids)
                .await?,
        );

        notifications
            .iter()
            .map(|notification| {
                let related = summaries
                    .get(&notification.related_user)
                    .ok_or(DomainError::UserNotFound)?;
                Ok(NotificationDto::project(notification, related))
            })
            .collect()
    }

    pub async fn mark_all_read(&self, user: UserId) -> Result<u64, ApplicationError> {
        Ok(self.deps.notification_repository.mark_all_read(user).await?)
    }
}
