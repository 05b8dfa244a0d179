//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::RepositoryError;
use crate::domain::book::BookError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 并发修改冲突（重试后仍失败）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound(msg) => Self::NotFound {
                resource_type: "Entity",
                id: msg,
            },
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<BookError> for ApplicationError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::EmptyContent | BookError::UnknownDirection(_) => {
                Self::ValidationError(err.to_string())
            }
            BookError::InconsistentState(msg) => Self::InvalidState(msg),
        }
    }
}
