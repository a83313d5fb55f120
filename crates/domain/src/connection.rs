//! 连接请求生命周期
//!
//! 请求只在 pending -> accepted / pending -> rejected 之间单向转移，
//! 并且只有接收方可以驱动转移。请求永远不会被删除。

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{RequestId, Timestamp, UserId};

/// 连接请求状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> DomainResult<Self> {
        match value {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(DomainError::validation("status", other)),
        }
    }
}

/// 连接请求实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub id: RequestId,
    pub sender: UserId,
    pub receiver: UserId,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConnectionRequest {
    pub fn new(id: RequestId, sender: UserId, receiver: UserId, now: Timestamp) -> Self {
        Self {
            id,
            sender,
            receiver,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// 接受请求。非 pending 状态或操作者不是接收方时失败。
    pub fn accept(&mut self, actor: UserId, now: Timestamp) -> DomainResult<()> {
        self.transition(actor, RequestStatus::Accepted, now)
    }

    /// 拒绝请求，前置条件与 accept 相同。
    pub fn reject(&mut self, actor: UserId, now: Timestamp) -> DomainResult<()> {
        self.transition(actor, RequestStatus::Rejected, now)
    }

    fn transition(
        &mut self,
        actor: UserId,
        target: RequestStatus,
        now: Timestamp,
    ) -> DomainResult<()> {
        if self.status != RequestStatus::Pending {
            return Err(DomainError::AlreadyProcessed);
        }
        if self.receiver != actor {
            return Err(DomainError::NotReceiver);
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }
}

/// 两个用户之间的关系状态查询结果
///
/// `None` 序列化为 "connect"，与前端按钮文案保持一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationState {
    Connected,
    Pending,
    Received { request_id: RequestId },
    None,
}

impl RelationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationState::Connected => "connected",
            RelationState::Pending => "pending",
            RelationState::Received { .. } => "received",
            RelationState::None => "connect",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn request() -> (ConnectionRequest, UserId, UserId) {
        let sender = UserId::from(Uuid::new_v4());
        let receiver = UserId::from(Uuid::new_v4());
        let req = ConnectionRequest::new(
            RequestId::from(Uuid::new_v4()),
            sender,
            receiver,
            Utc::now(),
        );
        (req, sender, receiver)
    }

    #[test]
    fn accept_by_receiver_succeeds() {
        let (mut req, _, receiver) = request();
        req.accept(receiver, Utc::now()).unwrap();
        assert_eq!(req.status, RequestStatus::Accepted);
    }

    #[test]
    fn accept_twice_fails_with_already_processed() {
        let (mut req, _, receiver) = request();
        req.accept(receiver, Utc::now()).unwrap();
        assert_eq!(
            req.accept(receiver, Utc::now()),
            Err(DomainError::AlreadyProcessed)
        );
    }

    #[test]
    fn reject_after_accept_fails() {
        let (mut req, _, receiver) = request();
        req.accept(receiver, Utc::now()).unwrap();
        assert_eq!(
            req.reject(receiver, Utc::now()),
            Err(DomainError::AlreadyProcessed)
        );
    }

    #[test]
    fn only_receiver_may_process() {
        let (mut req, sender, _) = request();
        assert_eq!(req.accept(sender, Utc::now()), Err(DomainError::NotReceiver));
        assert_eq!(req.reject(sender, Utc::now()), Err(DomainError::NotReceiver));
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn relation_state_wire_names() {
        assert_eq!(RelationState::Connected.as_str(), "connected");
        assert_eq!(RelationState::None.as_str(), "connect");
    }
}
