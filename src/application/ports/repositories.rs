//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::book::{
    Author, BookError, Chapter, ChapterId, Comment, CommentId, Paragraph, ParagraphId,
};
use crate::domain::OrderSlot;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// 乐观并发检查失败（读取后数据已被其他事务修改）
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: ChapterId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// 章节的一致性快照：同一个读事务中取得的章节、段落和评论
#[derive(Debug, Clone)]
pub struct ChapterSnapshot {
    pub chapter: ChapterRecord,
    /// 按 order 升序
    pub paragraphs: Vec<ParagraphRecord>,
    /// 按插入顺序
    pub comments: Vec<AuthoredCommentRecord>,
}

impl ChapterSnapshot {
    /// 组装为章节聚合
    pub fn into_chapter(self) -> Result<Chapter, BookError> {
        let paragraphs = self
            .paragraphs
            .into_iter()
            .map(ParagraphRecord::into_paragraph)
            .collect();
        let comments = self
            .comments
            .into_iter()
            .map(AuthoredCommentRecord::into_comment)
            .collect();

        Chapter::assemble(self.chapter.id, self.chapter.title, paragraphs, comments)
    }
}

/// 待导入的章节，段落已按目标顺序排列
#[derive(Debug, Clone)]
pub struct NewChapter {
    pub title: String,
    pub paragraphs: Vec<String>,
}

/// 目录导入结果
#[derive(Debug, Clone)]
pub struct ImportedCatalog {
    pub chapters: Vec<ChapterRecord>,
    pub paragraphs_created: usize,
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 新建章节（仅用于种子数据）
    async fn save(&self, title: &str) -> Result<ChapterRecord, RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: ChapterId) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 在一个事务中导入多个章节及其段落，任何一步失败都不留下记录
    ///
    /// 每个章节的段落 order 从 0 开始依次递增。
    async fn import_catalog(
        &self,
        chapters: &[NewChapter],
    ) -> Result<ImportedCatalog, RepositoryError>;

    /// 章节总数
    async fn count(&self) -> Result<usize, RepositoryError>;

    /// 读取单个章节的完整快照
    async fn load_snapshot(&self, id: ChapterId)
        -> Result<Option<ChapterSnapshot>, RepositoryError>;

    /// 读取全部章节的完整快照（按 id 升序）
    async fn load_all_snapshots(&self) -> Result<Vec<ChapterSnapshot>, RepositoryError>;
}

// ============================================================================
// Paragraph Repository
// ============================================================================

/// 段落实体（用于持久化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphRecord {
    pub id: ParagraphId,
    pub chapter_id: ChapterId,
    pub content: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParagraphRecord {
    pub fn slot(&self) -> OrderSlot {
        OrderSlot::new(self.id, self.order)
    }

    /// 转为不带评论的段落实体
    pub fn into_paragraph(self) -> Paragraph {
        Paragraph::new(
            self.id,
            self.chapter_id,
            self.content,
            self.order,
            self.created_at,
            self.updated_at,
        )
    }
}

/// 级联删除的结果
#[derive(Debug, Clone)]
pub struct DeletedParagraph {
    pub paragraph: ParagraphRecord,
    pub comments_removed: usize,
}

/// Paragraph Repository Port
///
/// 段落顺序值的读写入口。所有写操作都是单条语句或单个事务。
#[async_trait]
pub trait ParagraphRepositoryPort: Send + Sync {
    /// 根据 ID 查找段落
    async fn find_by_id(&self, id: ParagraphId) -> Result<Option<ParagraphRecord>, RepositoryError>;

    /// 获取章节的全部段落，按 order 升序
    async fn list_ordered(&self, chapter_id: ChapterId)
        -> Result<Vec<ParagraphRecord>, RepositoryError>;

    /// 追加段落到章节末尾，order = max(order) + 1，空章节为 0
    async fn insert_at_end(
        &self,
        chapter_id: ChapterId,
        content: &str,
    ) -> Result<ParagraphRecord, RepositoryError>;

    /// 只替换正文；段落不存在时返回 None
    async fn update_content(
        &self,
        id: ParagraphId,
        content: &str,
    ) -> Result<Option<ParagraphRecord>, RepositoryError>;

    /// 在一个事务中交换两个段落的 order 值
    ///
    /// 两行都必须仍然持有读取时的 order，否则整个事务回滚并返回 `Conflict`。
    async fn swap_order(
        &self,
        chapter_id: ChapterId,
        moving: OrderSlot,
        neighbour: OrderSlot,
    ) -> Result<(), RepositoryError>;

    /// 在一个事务中先删除段落的全部评论，再删除段落；段落不存在时返回 None
    async fn delete_cascade(&self, id: ParagraphId)
        -> Result<Option<DeletedParagraph>, RepositoryError>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// 评论实体（用于持久化）
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: CommentId,
    pub paragraph_id: ParagraphId,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// 带作者信息的评论
#[derive(Debug, Clone)]
pub struct AuthoredCommentRecord {
    pub comment: CommentRecord,
    pub author: UserRecord,
}

impl AuthoredCommentRecord {
    pub fn into_comment(self) -> Comment {
        Comment::new(
            self.comment.id,
            self.comment.paragraph_id,
            self.comment.content,
            self.author.into_author(),
            self.comment.created_at,
        )
    }
}

/// 待插入的评论
#[derive(Debug, Clone)]
pub struct NewComment {
    pub paragraph_id: ParagraphId,
    pub user_id: String,
    pub content: String,
}

/// Comment Repository Port
#[async_trait]
pub trait CommentRepositoryPort: Send + Sync {
    /// 保存评论
    async fn save(&self, comment: &NewComment) -> Result<CommentRecord, RepositoryError>;

    /// 获取段落的所有评论（插入顺序）
    async fn find_by_paragraph(
        &self,
        paragraph_id: ParagraphId,
    ) -> Result<Vec<CommentRecord>, RepositoryError>;
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户资料（外部认证服务的镜像）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl UserRecord {
    pub fn into_author(self) -> Author {
        Author::new(self.id, self.name, self.image)
    }
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 写入或刷新用户资料
    async fn upsert(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepositoryError>;
}
