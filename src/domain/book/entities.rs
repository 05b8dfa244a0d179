//! Book Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChapterId, CommentId, ParagraphId};

/// 评论作者（由外部认证服务管理，只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    id: String,
    name: Option<String>,
    image: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>, name: Option<String>, image: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            image,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// 段落评论
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    paragraph_id: ParagraphId,
    content: String,
    author: Author,
    created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        paragraph_id: ParagraphId,
        content: String,
        author: Author,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            paragraph_id,
            content,
            author,
            created_at,
        }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn paragraph_id(&self) -> ParagraphId {
        self.paragraph_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 段落
///
/// 不变量:
/// - 只属于一个章节，编辑不会改变归属
/// - order 在章节内唯一，决定显示位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    id: ParagraphId,
    chapter_id: ChapterId,
    content: String,
    order: i64,
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Paragraph {
    pub fn new(
        id: ParagraphId,
        chapter_id: ChapterId,
        content: String,
        order: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            chapter_id,
            content,
            order,
            comments: Vec::new(),
            created_at,
            updated_at,
        }
    }

    pub(super) fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn id(&self) -> ParagraphId {
        self.id
    }

    pub fn chapter_id(&self) -> ChapterId {
        self.chapter_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
