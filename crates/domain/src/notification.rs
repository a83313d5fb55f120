//! 通知实体定义
//!
//! 通知作为其他服务的副作用被追加写入，除已读标记外没有生命周期。

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{NotificationId, PostId, Timestamp, UserId};

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    ConnectionAccepted,
    ConnectionRejected,
    Like,
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ConnectionAccepted => "connectionAccepted",
            NotificationKind::ConnectionRejected => "connectionRejected",
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
        }
    }

    pub fn parse(value: &str) -> DomainResult<Self> {
        match value {
            "connectionAccepted" => Ok(NotificationKind::ConnectionAccepted),
            "connectionRejected" => Ok(NotificationKind::ConnectionRejected),
            "like" => Ok(NotificationKind::Like),
            "comment" => Ok(NotificationKind::Comment),
            other => Err(DomainError::validation("type", other)),
        }
    }
}

/// 通知实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub receiver: UserId,
    pub kind: NotificationKind,
    pub related_user: UserId,
    pub related_post: Option<PostId>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        receiver: UserId,
        kind: NotificationKind,
        related_user: UserId,
        related_post: Option<PostId>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            receiver,
            kind,
            related_user,
            related_post,
            is_read: false,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_wire_name() {
        for kind in [
            NotificationKind::ConnectionAccepted,
            NotificationKind::ConnectionRejected,
            NotificationKind::Like,
            NotificationKind::Comment,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(NotificationKind::parse("poke").is_err());
    }
}
