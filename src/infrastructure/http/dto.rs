//! Data Transfer Objects
//!
//! JSON 字段统一使用 camelCase

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::application::{DeleteParagraphResponse, MoveOutcome, MoveParagraphResponse, ParagraphRecord};
use crate::domain::book::{
    Author, Chapter, ChapterId, Comment, CommentId, MoveDirection, Paragraph, ParagraphId,
};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// 请求参数
// ============================================================================

/// 请求体中的 ID，接受数字或数字字符串
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdParam {
    Number(i64),
    Text(String),
}

impl IdParam {
    pub fn parse(&self, field: &str) -> Result<i64, ApiError> {
        match self {
            IdParam::Number(n) => Ok(*n),
            IdParam::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ApiError::BadRequest(format!("{} must be an integer, got {:?}", field, s))),
        }
    }
}

/// 取出必填字段
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("{} is required", field)))
}

/// 取出必填 ID 字段并解析
pub fn required_id(value: Option<&IdParam>, field: &str) -> Result<i64, ApiError> {
    required(value, field)?.parse(field)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParagraphRequest {
    pub content: Option<String>,
    pub chapter_id: Option<IdParam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditParagraphRequest {
    pub id: Option<IdParam>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParagraphRequest {
    pub id: Option<IdParam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderParagraphRequest {
    pub paragraph_id: Option<IdParam>,
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub paragraph_id: Option<IdParam>,
    pub content: Option<String>,
}

// ============================================================================
// 响应
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<&Author> for AuthorDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id().to_string(),
            name: author.name().map(str::to_string),
            image: author.image().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: CommentId,
    pub paragraph_id: ParagraphId,
    pub content: String,
    pub author: AuthorDto,
    pub created_at: String,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id(),
            paragraph_id: comment.paragraph_id(),
            content: comment.content().to_string(),
            author: AuthorDto::from(comment.author()),
            created_at: comment.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphDto {
    pub id: ParagraphId,
    pub chapter_id: ChapterId,
    pub content: String,
    pub order: i64,
    pub comments: Vec<CommentDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Paragraph> for ParagraphDto {
    fn from(paragraph: &Paragraph) -> Self {
        Self {
            id: paragraph.id(),
            chapter_id: paragraph.chapter_id(),
            content: paragraph.content().to_string(),
            order: paragraph.order(),
            comments: paragraph.comments().iter().map(CommentDto::from).collect(),
            created_at: paragraph.created_at().to_rfc3339(),
            updated_at: paragraph.updated_at().to_rfc3339(),
        }
    }
}

/// 单独读取的段落不带评论
impl From<ParagraphRecord> for ParagraphDto {
    fn from(record: ParagraphRecord) -> Self {
        Self {
            id: record.id,
            chapter_id: record.chapter_id,
            content: record.content,
            order: record.order,
            comments: Vec::new(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDto {
    pub id: ChapterId,
    pub title: String,
    pub paragraphs: Vec<ParagraphDto>,
}

impl From<&Chapter> for ChapterDto {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id(),
            title: chapter.title().to_string(),
            paragraphs: chapter.paragraphs().iter().map(ParagraphDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParagraphDto {
    pub message: String,
    pub paragraph_id: ParagraphId,
    pub chapter_id: ChapterId,
    pub comments_removed: usize,
}

impl From<DeleteParagraphResponse> for DeleteParagraphDto {
    fn from(response: DeleteParagraphResponse) -> Self {
        Self {
            message: "Paragraph deleted successfully".to_string(),
            paragraph_id: response.paragraph_id,
            chapter_id: response.chapter_id,
            comments_removed: response.comments_removed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderParagraphDto {
    pub message: String,
    pub paragraph_id: ParagraphId,
    pub chapter_id: ChapterId,
    pub direction: MoveDirection,
    pub outcome: MoveOutcome,
    pub attempts: u32,
}

impl From<MoveParagraphResponse> for ReorderParagraphDto {
    fn from(response: MoveParagraphResponse) -> Self {
        let message = match response.outcome {
            MoveOutcome::Moved { .. } => "Paragraph reordered successfully",
            MoveOutcome::Unchanged => "Paragraph already at the boundary",
        };

        Self {
            message: message.to_string(),
            paragraph_id: response.paragraph_id,
            chapter_id: response.chapter_id,
            direction: response.direction,
            outcome: response.outcome,
            attempts: response.attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_param_accepts_numbers_and_strings() {
        let body: DeleteParagraphRequest = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        assert_eq!(required_id(body.id.as_ref(), "id").unwrap(), 12);

        let body: DeleteParagraphRequest = serde_json::from_str(r#"{"id": " 34 "}"#).unwrap();
        assert_eq!(required_id(body.id.as_ref(), "id").unwrap(), 34);

        let body: DeleteParagraphRequest = serde_json::from_str(r#"{"id": "doce"}"#).unwrap();
        assert!(matches!(
            required_id(body.id.as_ref(), "id"),
            Err(ApiError::BadRequest(_))
        ));

        let body: DeleteParagraphRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            required_id(body.id.as_ref(), "id"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_requests_use_camel_case() {
        let body: ReorderParagraphRequest =
            serde_json::from_str(r#"{"paragraphId": "7", "direction": "down"}"#).unwrap();
        assert_eq!(required_id(body.paragraph_id.as_ref(), "paragraphId").unwrap(), 7);
        assert_eq!(body.direction.as_deref(), Some("down"));
    }
}
