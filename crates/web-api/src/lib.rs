//! HTTP / WebSocket 接入层。
//!
//! 路由把请求翻译成应用层服务调用，`ApiError` 负责统一的错误翻译，
//! WebSocket 通道负责把事件信封转发给对应的在线连接。

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;
pub mod ws;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
