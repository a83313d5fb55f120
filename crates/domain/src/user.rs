use serde::{Deserialize, Serialize};

use crate::value_objects::{Timestamp, UserId};

/// 用户实体
///
/// 身份字段由注册流程（外部协作方）负责填充，这里只维护连接集合的
/// 集合语义：重复添加幂等，移除不存在的连接是 no-op。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub headline: Option<String>,
    pub profile_image: Option<String>,
    /// 已连接用户集合，无序且唯一
    pub connections: Vec<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_connected_to(&self, other: UserId) -> bool {
        self.connections.contains(&other)
    }

    /// 幂等添加：已存在时不产生重复项
    pub fn add_connection(&mut self, other: UserId, now: Timestamp) {
        if !self.connections.contains(&other) {
            self.connections.push(other);
            self.updated_at = now;
        }
    }

    /// 移除连接，不存在时为 no-op
    pub fn remove_connection(&mut self, other: UserId, now: Timestamp) {
        let before = self.connections.len();
        self.connections.retain(|id| *id != other);
        if self.connections.len() != before {
            self.updated_at = now;
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            user_name: self.user_name.clone(),
            headline: self.headline.clone(),
            profile_image: self.profile_image.clone(),
        }
    }
}

/// 用户身份投影，用于响应里携带的作者/发送者信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub headline: Option<String>,
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn user(id: UserId) -> User {
        let now = Utc::now();
        User {
            id,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            user_name: "ada".into(),
            headline: None,
            profile_image: None,
            connections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn add_connection_is_idempotent() {
        let a = UserId::from(Uuid::new_v4());
        let b = UserId::from(Uuid::new_v4());
        let mut u = user(a);

        u.add_connection(b, Utc::now());
        u.add_connection(b, Utc::now());

        assert_eq!(u.connections, vec![b]);
        assert!(u.is_connected_to(b));
    }

    #[test]
    fn remove_absent_connection_is_noop() {
        let a = UserId::from(Uuid::new_v4());
        let b = UserId::from(Uuid::new_v4());
        let mut u = user(a);

        u.remove_connection(b, Utc::now());

        assert!(u.connections.is_empty());
    }
}
