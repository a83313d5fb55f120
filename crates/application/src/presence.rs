//! 在线状态注册表
//!
//! 维护 userId -> channelId 的映射，服务在发送定向事件前通过它查找
//! 目标通道。映射只存在于进程生命周期内，进程重启后丢失——它只
//! 描述“当前”的连接状态。

use std::collections::HashMap;

use async_trait::async_trait;
use domain::{ChannelId, UserId};
use tokio::sync::RwLock;

/// 在线状态注册表 trait
///
/// 注入到各服务中，而不是作为全局可变状态访问。
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// upsert 语义：同一用户的后一次注册覆盖前一次的通道
    async fn register(&self, user: UserId, channel: ChannelId);
    /// 按通道反查并移除，未找到时为 no-op
    async fn unregister(&self, channel: ChannelId);
    async fn lookup(&self, user: UserId) -> Option<ChannelId>;
}

/// 进程内实现，基于读写锁保护的 HashMap
///
/// 多线程运行时下 map 的并发访问必须有同步原语，这里用 RwLock。
#[derive(Debug, Default)]
pub struct MemoryPresenceRegistry {
    entries: RwLock<HashMap<UserId, ChannelId>>,
}

impl MemoryPresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRegistry for MemoryPresenceRegistry {
    async fn register(&self, user: UserId, channel: ChannelId) {
        let previous = self.entries.write().await.insert(user, channel);
        if let Some(previous) = previous {
            tracing::debug!(user_id = %user, old_channel = %previous, "用户重新注册，覆盖旧通道");
        }
        tracing::info!(user_id = %user, channel_id = %channel, "用户上线");
    }

    async fn unregister(&self, channel: ChannelId) {
        let mut entries = self.entries.write().await;
        let user = entries
            .iter()
            .find_map(|(user, ch)| (*ch == channel).then_some(*user));
        if let Some(user) = user {
            entries.remove(&user);
            tracing::info!(user_id = %user, channel_id = %channel, "用户下线");
        }
    }

    async fn lookup(&self, user: UserId) -> Option<ChannelId> {
        self.entries.read().await.get(&user).copied()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn ids() -> (UserId, ChannelId, ChannelId) {
        (
            UserId::from(Uuid::new_v4()),
            ChannelId::from(Uuid::new_v4()),
            ChannelId::from(Uuid::new_v4()),
        )
    }

    #[tokio::test]
    async fn register_overwrites_previous_channel() {
        let (user, first, second) = ids();
        let registry = MemoryPresenceRegistry::new();

        registry.register(user, first).await;
        registry.register(user, second).await;

        assert_eq!(registry.lookup(user).await, Some(second));
    }

    #[tokio::test]
    async fn unregister_removes_matching_entry_only() {
        let (user, channel, other) = ids();
        let registry = MemoryPresenceRegistry::new();
        registry.register(user, channel).await;

        // 不匹配的通道是 no-op
        registry.unregister(other).await;
        assert_eq!(registry.lookup(user).await, Some(channel));

        registry.unregister(channel).await;
        assert_eq!(registry.lookup(user).await, None);
    }

    #[tokio::test]
    async fn lookup_unknown_user_is_none() {
        let (user, _, _) = ids();
        let registry = MemoryPresenceRegistry::new();
        assert_eq!(registry.lookup(user).await, None);
    }
}
