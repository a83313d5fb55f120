use std::sync::Arc;

use application::{
    ConnectionService, LocalEventPublisher, NotificationService, PostService, PresenceRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub connection_service: Arc<ConnectionService>,
    pub post_service: Arc<PostService>,
    pub notification_service: Arc<NotificationService>,
    /// WebSocket 注册/注销通过它绑定用户与通道
    pub presence: Arc<dyn PresenceRegistry>,
    /// WebSocket 连接直接订阅这个发布器
    pub publisher: LocalEventPublisher,
}

impl AppState {
    pub fn new(
        connection_service: Arc<ConnectionService>,
        post_service: Arc<PostService>,
        notification_service: Arc<NotificationService>,
        presence: Arc<dyn PresenceRegistry>,
        publisher: LocalEventPublisher,
    ) -> Self {
        Self {
            connection_service,
            post_service,
            notification_service,
            presence,
            publisher,
        }
    }
}
