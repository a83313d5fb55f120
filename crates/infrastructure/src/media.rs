//! 本地磁盘媒体存储
//!
//! 站在外部媒体主机的接缝后面：写入配置目录并返回可引用的 URL。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use application::media::{MediaError, MediaStore, MediaUpload};

pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, upload: MediaUpload) -> Result<String, MediaError> {
        // 丢弃客户端提供的路径部分，只保留文件名
        let filename = Path::new(&upload.filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload");
        let stored_name = format!("{}-{}", Uuid::new_v4(), filename);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| MediaError::Upload(err.to_string()))?;
        tokio::fs::write(self.root.join(&stored_name), &upload.bytes)
            .await
            .map_err(|err| MediaError::Upload(err.to_string()))?;

        tracing::debug!(file = %stored_name, "媒体文件已写入");
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), stored_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_writes_file_and_returns_url() {
        let dir = std::env::temp_dir().join(format!("media-test-{}", Uuid::new_v4()));
        let store = LocalMediaStore::new(&dir, "http://localhost:8080/media");

        let url = store
            .store(MediaUpload {
                filename: "../evil/../photo.png".into(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:8080/media/"));
        assert!(url.ends_with("photo.png"));
        // 路径部分被剥离，文件落在 root 下
        let stored = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(stored, 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
