//! Chapter HTTP Handlers - 只读

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use crate::application::{GetChapter, ListChapters, ListParagraphs};
use crate::domain::book::ChapterId;
use crate::infrastructure::http::dto::{ApiResponse, ChapterDto, ParagraphDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取章节（段落按顺序，评论挂在段落下）
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    chapter_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<ChapterDto>>, ApiError> {
    let Path(chapter_id) = chapter_id?;

    let chapter = state
        .get_chapter_handler
        .handle(GetChapter {
            chapter_id: ChapterId::new(chapter_id),
        })
        .await?;

    Ok(Json(ApiResponse::success(ChapterDto::from(&chapter))))
}

/// 获取全部章节
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ChapterDto>>>, ApiError> {
    let chapters = state.list_chapters_handler.handle(ListChapters).await?;

    Ok(Json(ApiResponse::success(
        chapters.iter().map(ChapterDto::from).collect(),
    )))
}

/// 获取章节内按顺序排列的段落（不含评论）
pub async fn list_chapter_paragraphs(
    State(state): State<Arc<AppState>>,
    chapter_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<ParagraphDto>>>, ApiError> {
    let Path(chapter_id) = chapter_id?;

    let paragraphs = state
        .list_paragraphs_handler
        .handle(ListParagraphs {
            chapter_id: ChapterId::new(chapter_id),
        })
        .await?;

    Ok(Json(ApiResponse::success(
        paragraphs.into_iter().map(ParagraphDto::from).collect(),
    )))
}
