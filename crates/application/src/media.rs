//! 媒体存储抽象
//!
//! 帖子图片委托给外部媒体主机，这里只定义接缝；上传失败会作为
//! 帖子创建失败向上传播。

use async_trait::async_trait;
use thiserror::Error;

/// 待上传的文件
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media upload failed: {0}")]
    Upload(String),
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// 存储文件并返回可引用的 URL，原样写入帖子记录
    async fn store(&self, upload: MediaUpload) -> Result<String, MediaError>;
}
