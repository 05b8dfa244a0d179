//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                       GET     健康检查
//! - /api/paragraphs                 POST    新增段落（追加到章节末尾）
//! - /api/paragraphs                 PUT     编辑段落正文
//! - /api/paragraphs                 DELETE  删除段落及其评论
//! - /api/paragraphs/reorder         PUT     段落上移/下移
//! - /api/paragraphs/:id             GET     获取单个段落
//! - /api/chapters                   GET     全部章节
//! - /api/chapters/:id               GET     章节聚合（段落 + 评论）
//! - /api/chapters/:id/paragraphs    GET     章节内段落（按顺序）
//! - /api/comments                   POST    发表评论
//! - /ws/events                      WS      全部章节的变更事件
//! - /ws/chapters/:id                WS      单个章节的变更事件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::global_websocket_handler))
        .route("/ws/chapters/:chapter_id", get(handlers::chapter_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/paragraphs", paragraph_routes())
        .nest("/chapters", chapter_routes())
        .route("/comments", post(handlers::add_comment))
}

/// Paragraph 路由
fn paragraph_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            post(handlers::create_paragraph)
                .put(handlers::edit_paragraph)
                .delete(handlers::delete_paragraph),
        )
        .route("/reorder", put(handlers::reorder_paragraph))
        .route("/:paragraph_id", get(handlers::get_paragraph))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_chapters))
        .route("/:chapter_id", get(handlers::get_chapter))
        .route("/:chapter_id/paragraphs", get(handlers::list_chapter_paragraphs))
}
