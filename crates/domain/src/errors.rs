//! 领域模型错误定义
//!
//! 定义了系统中所有可能的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 不能给自己发送连接请求
    #[error("you cannot send a request to yourself")]
    SelfRequest,

    /// 双方已经是连接状态
    #[error("you are already connected")]
    AlreadyConnected,

    /// 同一对用户之间已有待处理的请求
    #[error("request already exists")]
    DuplicateRequest,

    /// 连接请求不存在
    #[error("connection does not exist")]
    RequestNotFound,

    /// 请求已经被接受或拒绝过
    #[error("request already processed")]
    AlreadyProcessed,

    /// 只有请求的接收方可以处理请求
    #[error("unauthorized action")]
    NotReceiver,

    /// 帖子不存在
    #[error("post not found")]
    PostNotFound,

    /// 用户不存在
    #[error("user not found")]
    UserNotFound,

    /// 验证错误
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 存储层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// 记录不存在
    #[error("record not found")]
    NotFound,

    /// 唯一约束冲突（例如同一对用户的第二条 pending 请求）
    #[error("conflicting record already exists")]
    Conflict,

    /// 底层存储故障
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
