use domain::{DomainError, RepositoryError};
use thiserror::Error;

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    #[error("media error: {0}")]
    Media(String),
}

impl ApplicationError {
    pub fn media(message: impl Into<String>) -> Self {
        ApplicationError::Media(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Repository(value)
    }
}
