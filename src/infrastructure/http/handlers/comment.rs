//! Comment HTTP Handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::application::AddComment;
use crate::domain::book::ParagraphId;
use crate::infrastructure::events::ChapterEvent;
use crate::infrastructure::http::auth::AuthenticatedActor;
use crate::infrastructure::http::dto::{
    required, required_id, AddCommentRequest, ApiResponse, CommentDto,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 发表评论
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CommentDto>>), ApiError> {
    let Json(request) = payload?;
    let paragraph_id = ParagraphId::new(required_id(request.paragraph_id.as_ref(), "paragraphId")?);
    let content = required(request.content, "content")?;

    let response = state
        .add_comment_handler
        .handle(AddComment {
            actor,
            paragraph_id,
            content,
        })
        .await?;

    state.event_publisher.publish(ChapterEvent::CommentAdded {
        chapter_id: response.chapter_id,
        paragraph_id: response.comment.paragraph_id(),
        comment_id: response.comment.id(),
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentDto::from(&response.comment))),
    ))
}
