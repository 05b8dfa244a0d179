//! 请求级身份
//!
//! 认证由上游完成，应用层只接收"谁在操作"这一事实。
//! 每个写命令都显式携带 Actor，不依赖任何全局会话状态。

use crate::application::ports::UserRecord;

/// 已认证的操作者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// 认证服务分配的用户 ID
    pub user_id: String,
    /// 显示名称
    pub name: Option<String>,
    /// 头像地址
    pub image: Option<String>,
}

impl Actor {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            image: None,
        }
    }

    pub fn with_profile(mut self, name: Option<String>, image: Option<String>) -> Self {
        self.name = name;
        self.image = image;
        self
    }

    /// 转为可持久化的用户资料
    pub fn to_user_record(&self) -> UserRecord {
        UserRecord {
            id: self.user_id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}
