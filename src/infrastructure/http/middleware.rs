//! HTTP Middleware
//!
//! 4xx/5xx 响应日志，附带请求耗时和操作者

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::state::AppState;

/// HTTP 状态码错误日志中间件
///
/// 业务错误的具体原因在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user_id = request
        .headers()
        .get(state.identity_headers.user_id.as_str())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            user_id = %user_id,
            elapsed_ms = elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            user_id = %user_id,
            elapsed_ms = elapsed_ms,
            "HTTP client error"
        );
    }

    response
}
