//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("内容不能为空")]
    EmptyContent,

    #[error("无效的移动方向: {0}")]
    UnknownDirection(String),

    #[error("数据状态不一致: {0}")]
    InconsistentState(String),
}
