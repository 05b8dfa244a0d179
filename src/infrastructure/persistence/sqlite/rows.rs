//! SQLite 行结构与记录转换

use sqlx::FromRow;

use super::database::parse_timestamp;
use crate::application::ports::{
    AuthoredCommentRecord, ChapterRecord, CommentRecord, ParagraphRecord, RepositoryError,
    UserRecord,
};
use crate::domain::book::{ChapterId, CommentId, ParagraphId};

#[derive(FromRow)]
pub(super) struct ChapterRow {
    pub id: i64,
    pub title: String,
    pub created_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: ChapterId::new(row.id),
            title: row.title,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
pub(super) struct ParagraphRow {
    pub id: i64,
    pub chapter_id: i64,
    pub content: String,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ParagraphRow> for ParagraphRecord {
    type Error = RepositoryError;

    fn try_from(row: ParagraphRow) -> Result<Self, Self::Error> {
        Ok(ParagraphRecord {
            id: ParagraphId::new(row.id),
            chapter_id: ChapterId::new(row.chapter_id),
            content: row.content,
            order: row.sort_order,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
pub(super) struct CommentRow {
    pub id: i64,
    pub paragraph_id: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

impl TryFrom<CommentRow> for CommentRecord {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(CommentRecord {
            id: CommentId::new(row.id),
            paragraph_id: ParagraphId::new(row.paragraph_id),
            user_id: row.user_id,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// 评论 JOIN 段落 JOIN 用户
#[derive(FromRow)]
pub(super) struct AuthoredCommentRow {
    pub id: i64,
    pub paragraph_id: i64,
    pub chapter_id: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
}

impl TryFrom<AuthoredCommentRow> for AuthoredCommentRecord {
    type Error = RepositoryError;

    fn try_from(row: AuthoredCommentRow) -> Result<Self, Self::Error> {
        Ok(AuthoredCommentRecord {
            comment: CommentRecord {
                id: CommentId::new(row.id),
                paragraph_id: ParagraphId::new(row.paragraph_id),
                user_id: row.user_id.clone(),
                content: row.content,
                created_at: parse_timestamp(&row.created_at)?,
            },
            author: UserRecord {
                id: row.user_id,
                name: row.user_name,
                image: row.user_image,
            },
        })
    }
}

#[derive(FromRow)]
pub(super) struct UserRow {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: row.id,
            name: row.name,
            image: row.image,
        }
    }
}
