//! 实时事件推送
//!
//! 单一的 fire-and-forget 扇出通道：状态变更定向推给两个相关方，
//! 点赞/评论更新不区分受众广播给所有在线通道。没有持久化、没有
//! 送达保证、没有背压。

use async_trait::async_trait;
use domain::{ChannelId, PostId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::dto::CommentDto;

/// 服务端推送给客户端的事件，`event` 字段是线上名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum RealtimeEvent {
    #[serde(rename = "statusUpdate")]
    StatusUpdate {
        #[serde(rename = "updatedUserId")]
        updated_user_id: UserId,
        #[serde(rename = "newStatus")]
        new_status: String,
    },
    #[serde(rename = "likeUpdated")]
    LikeUpdated {
        #[serde(rename = "postId")]
        post_id: PostId,
        likes: Vec<UserId>,
    },
    #[serde(rename = "commentAdded")]
    CommentAdded {
        #[serde(rename = "postId")]
        post_id: PostId,
        comments: Vec<CommentDto>,
    },
}

/// 推送信封：`target` 为 None 表示广播给所有在线通道
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    pub target: Option<ChannelId>,
    pub event: RealtimeEvent,
}

impl EventEnvelope {
    pub fn to_channel(channel: ChannelId, event: RealtimeEvent) -> Self {
        Self {
            target: Some(channel),
            event,
        }
    }

    pub fn broadcast(event: RealtimeEvent) -> Self {
        Self {
            target: None,
            event,
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, envelope: EventEnvelope) -> Result<(), PublishError>;
}

/// 进程内发布器，基于 tokio broadcast channel
///
/// 每个 WebSocket 连接订阅一份，按信封的 target 自行过滤。
/// 没有任何订阅者时发送失败，这是预期情况而不是错误。
#[derive(Clone)]
pub struct LocalEventPublisher {
    sender: broadcast::Sender<EventEnvelope>,
}

impl LocalEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for LocalEventPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for LocalEventPublisher {
    async fn publish(&self, envelope: EventEnvelope) -> Result<(), PublishError> {
        // 没有在线连接时 send 返回 Err，事件直接丢弃
        let _ = self.sender.send(envelope);
        Ok(())
    }
}
