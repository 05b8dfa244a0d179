//! Paragraph HTTP Handlers
//!
//! 写操作成功后发布章节事件；边界上的无效移动不发布。

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::application::{
    CreateParagraph, DeleteParagraph, EditParagraph, GetParagraph, MoveOutcome, MoveParagraph,
};
use crate::domain::book::{ChapterId, MoveDirection, ParagraphId};
use crate::infrastructure::events::ChapterEvent;
use crate::infrastructure::http::auth::AuthenticatedActor;
use crate::infrastructure::http::dto::{
    required, required_id, ApiResponse, CreateParagraphRequest, DeleteParagraphDto,
    DeleteParagraphRequest, EditParagraphRequest, ParagraphDto, ReorderParagraphDto,
    ReorderParagraphRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 新增段落（追加到章节末尾）
pub async fn create_paragraph(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    payload: Result<Json<CreateParagraphRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ParagraphDto>>), ApiError> {
    let Json(request) = payload?;
    let content = required(request.content, "content")?;
    let chapter_id = ChapterId::new(required_id(request.chapter_id.as_ref(), "chapterId")?);

    let paragraph = state
        .create_paragraph_handler
        .handle(CreateParagraph {
            actor,
            chapter_id,
            content,
        })
        .await?;

    state.event_publisher.publish(ChapterEvent::ParagraphCreated {
        chapter_id: paragraph.chapter_id,
        paragraph_id: paragraph.id,
        order: paragraph.order,
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ParagraphDto::from(paragraph))),
    ))
}

/// 编辑段落正文
pub async fn edit_paragraph(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    payload: Result<Json<EditParagraphRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ParagraphDto>>, ApiError> {
    let Json(request) = payload?;
    let paragraph_id = ParagraphId::new(required_id(request.id.as_ref(), "id")?);
    let content = required(request.content, "content")?;

    let paragraph = state
        .edit_paragraph_handler
        .handle(EditParagraph {
            actor,
            paragraph_id,
            content,
        })
        .await?;

    state.event_publisher.publish(ChapterEvent::ParagraphEdited {
        chapter_id: paragraph.chapter_id,
        paragraph_id: paragraph.id,
    });

    Ok(Json(ApiResponse::success(ParagraphDto::from(paragraph))))
}

/// 删除段落及其全部评论
pub async fn delete_paragraph(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    payload: Result<Json<DeleteParagraphRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DeleteParagraphDto>>, ApiError> {
    let Json(request) = payload?;
    let paragraph_id = ParagraphId::new(required_id(request.id.as_ref(), "id")?);

    let response = state
        .delete_paragraph_handler
        .handle(DeleteParagraph {
            actor,
            paragraph_id,
        })
        .await?;

    state.event_publisher.publish(ChapterEvent::ParagraphDeleted {
        chapter_id: response.chapter_id,
        paragraph_id: response.paragraph_id,
        comments_removed: response.comments_removed,
    });

    Ok(Json(ApiResponse::success(DeleteParagraphDto::from(response))))
}

/// 段落上移/下移
pub async fn reorder_paragraph(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    payload: Result<Json<ReorderParagraphRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ReorderParagraphDto>>, ApiError> {
    let Json(request) = payload?;
    let paragraph_id = ParagraphId::new(required_id(request.paragraph_id.as_ref(), "paragraphId")?);
    let direction = required(request.direction, "direction")?
        .parse::<MoveDirection>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let response = state
        .move_paragraph_handler
        .handle(MoveParagraph {
            actor,
            paragraph_id,
            direction,
        })
        .await?;

    if let MoveOutcome::Moved { swapped_with, .. } = response.outcome {
        state.event_publisher.publish(ChapterEvent::ParagraphMoved {
            chapter_id: response.chapter_id,
            paragraph_id: response.paragraph_id,
            swapped_with,
            direction: response.direction,
        });
    }

    Ok(Json(ApiResponse::success(ReorderParagraphDto::from(response))))
}

/// 获取单个段落（不含评论）
pub async fn get_paragraph(
    State(state): State<Arc<AppState>>,
    paragraph_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<ParagraphDto>>, ApiError> {
    let Path(paragraph_id) = paragraph_id?;

    let paragraph = state
        .get_paragraph_handler
        .handle(GetParagraph {
            paragraph_id: ParagraphId::new(paragraph_id),
        })
        .await?;

    Ok(Json(ApiResponse::success(ParagraphDto::from(paragraph))))
}
