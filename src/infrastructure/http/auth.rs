//! 请求身份提取
//!
//! 认证在上游网关完成，网关把用户信息写入受信任的请求头。
//! 写操作的 handler 通过 `AuthenticatedActor` 取得操作者，缺少用户 ID 时返回 401。

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::error::ApiError;
use super::state::AppState;
use crate::application::Actor;

/// 身份请求头名称
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: String,
    pub user_name: String,
    pub user_image: String,
}

impl Default for IdentityHeaders {
    fn default() -> Self {
        Self {
            user_id: "x-user-id".to_string(),
            user_name: "x-user-name".to_string(),
            user_image: "x-user-image".to_string(),
        }
    }
}

impl IdentityHeaders {
    fn read(parts: &Parts, name: &str) -> Option<String> {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// 从请求头解析操作者
    pub fn actor(&self, parts: &Parts) -> Option<Actor> {
        let user_id = Self::read(parts, &self.user_id)?;
        Some(Actor::new(user_id).with_profile(
            Self::read(parts, &self.user_name),
            Self::read(parts, &self.user_image),
        ))
    }
}

/// 已认证的操作者
#[derive(Debug, Clone)]
pub struct AuthenticatedActor(pub Actor);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state
            .identity_headers
            .actor(parts)
            .map(AuthenticatedActor)
            .ok_or_else(|| {
                ApiError::Unauthorized(format!(
                    "Authentication required: missing {} header",
                    state.identity_headers.user_id
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/paragraphs");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_actor_from_headers() {
        let headers = IdentityHeaders::default();
        let actor = headers
            .actor(&parts(&[("x-user-id", "u9"), ("x-user-name", "Teresa")]))
            .unwrap();

        assert_eq!(actor.user_id, "u9");
        assert_eq!(actor.name.as_deref(), Some("Teresa"));
        assert_eq!(actor.image, None);
    }

    #[test]
    fn test_blank_user_id_is_anonymous() {
        let headers = IdentityHeaders::default();
        assert!(headers.actor(&parts(&[("x-user-id", "  ")])).is_none());
        assert!(headers.actor(&parts(&[])).is_none());
    }

    #[test]
    fn test_custom_header_names() {
        let headers = IdentityHeaders {
            user_id: "x-auth-sub".to_string(),
            ..Default::default()
        };
        assert!(headers.actor(&parts(&[("x-user-id", "u1")])).is_none());
        assert_eq!(
            headers.actor(&parts(&[("x-auth-sub", "u1")])).unwrap().user_id,
            "u1"
        );
    }
}
