//! 基础设施层：PostgreSQL 仓库实现与本地媒体存储。

pub mod db;
pub mod media;

pub use db::{
    create_pg_pool, PgConnectionRepository, PgNotificationRepository, PgPostRepository,
    PgUserRepository,
};
pub use media::LocalMediaStore;
