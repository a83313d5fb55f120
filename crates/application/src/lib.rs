//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理输入校验、副作用编排、
//! 以及对外部适配器（在线状态、事件推送、媒体存储）的抽象。

pub mod clock;
pub mod dto;
pub mod error;
pub mod events;
pub mod media;
pub mod presence;
pub mod repository;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use dto::{
    CommentDto, ConnectionRequestDto, NotificationDto, PendingRequestDto, PostDto, RelationDto,
    UserSummaryDto,
};
pub use error::ApplicationError;
pub use events::{EventEnvelope, EventPublisher, LocalEventPublisher, PublishError, RealtimeEvent};
pub use media::{MediaError, MediaStore, MediaUpload};
pub use presence::{MemoryPresenceRegistry, PresenceRegistry};
pub use repository::{
    ConnectionRepository, NotificationRepository, PostRepository, UserRepository,
};
pub use services::{
    ConnectionService, ConnectionServiceDependencies, NotificationService,
    NotificationServiceDependencies, PostService, PostServiceDependencies,
};
