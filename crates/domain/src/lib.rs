//! 社交图谱系统核心领域模型
//!
//! 包含用户、连接请求、帖子、通知等核心实体，以及相关的业务规则。

pub mod connection;
pub mod errors;
pub mod notification;
pub mod post;
pub mod user;
pub mod value_objects;

pub use connection::{ConnectionRequest, RelationState, RequestStatus};
pub use errors::{DomainError, DomainResult, RepositoryError};
pub use notification::{Notification, NotificationKind};
pub use post::{Comment, LikeToggle, Post};
pub use user::{User, UserSummary};
pub use value_objects::{ChannelId, NotificationId, PostId, RequestId, Timestamp, UserId};
