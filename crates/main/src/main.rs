//! 主应用程序入口
//!
//! 组装仓库、服务和实时通道，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{
    services::{
        ConnectionService, ConnectionServiceDependencies, NotificationService,
        NotificationServiceDependencies, PostService, PostServiceDependencies,
    },
    LocalEventPublisher, MemoryPresenceRegistry, SystemClock,
};
use config::AppConfig;
use infrastructure::{
    create_pg_pool, LocalMediaStore, PgConnectionRepository, PgNotificationRepository,
    PgPostRepository, PgUserRepository,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );

    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    // 创建仓库实例
    let user_repository = Arc::new(PgUserRepository::new(pg_pool.clone()));
    let connection_repository = Arc::new(PgConnectionRepository::new(pg_pool.clone()));
    let post_repository = Arc::new(PgPostRepository::new(pg_pool.clone()));
    let notification_repository = Arc::new(PgNotificationRepository::new(pg_pool));

    // 进程内协作者：在线状态、事件发布器、媒体存储、时钟
    let presence = Arc::new(MemoryPresenceRegistry::new());
    let publisher = LocalEventPublisher::new(config.broadcast.capacity);
    let media_store = Arc::new(LocalMediaStore::new(
        &config.media.root,
        &config.media.base_url,
    ));
    let clock: Arc<dyn application::Clock> = Arc::new(SystemClock::default());

    // 创建应用层服务
    let connection_service = ConnectionService::new(ConnectionServiceDependencies {
        user_repository: user_repository.clone(),
        connection_repository: connection_repository.clone(),
        notification_repository: notification_repository.clone(),
        presence: presence.clone(),
        publisher: Arc::new(publisher.clone()),
        clock: clock.clone(),
    });

    let post_service = PostService::new(PostServiceDependencies {
        post_repository,
        user_repository: user_repository.clone(),
        notification_repository: notification_repository.clone(),
        media_store,
        publisher: Arc::new(publisher.clone()),
        clock,
    });

    let notification_service = NotificationService::new(NotificationServiceDependencies {
        notification_repository,
        user_repository,
    });

    let state = AppState::new(
        Arc::new(connection_service),
        Arc::new(post_service),
        Arc::new(notification_service),
        presence,
        publisher,
    );

    // 启动 Web 服务器
    let app = router(state);
    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!("社交服务启动在 http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
