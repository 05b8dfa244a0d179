//! Paragraph Command Handlers - 段落生命周期

use std::sync::Arc;

use crate::application::commands::{CreateParagraph, DeleteParagraph, EditParagraph};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRepositoryPort, ParagraphRecord, ParagraphRepositoryPort};
use crate::domain::book::{ChapterId, Content, ParagraphId};

// ============================================================================
// CreateParagraph
// ============================================================================

/// CreateParagraph Handler - 追加段落到章节末尾
pub struct CreateParagraphHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
}

impl CreateParagraphHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
    ) -> Self {
        Self {
            chapter_repo,
            paragraph_repo,
        }
    }

    pub async fn handle(&self, command: CreateParagraph) -> Result<ParagraphRecord, ApplicationError> {
        let content = Content::new(command.content)?;

        self.chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        let paragraph = self
            .paragraph_repo
            .insert_at_end(command.chapter_id, content.as_str())
            .await?;

        tracing::info!(
            paragraph_id = %paragraph.id,
            chapter_id = %paragraph.chapter_id,
            order = paragraph.order,
            user_id = %command.actor.user_id,
            "Paragraph created"
        );

        Ok(paragraph)
    }
}

// ============================================================================
// EditParagraph
// ============================================================================

/// EditParagraph Handler - 只替换正文，顺序和归属不变
pub struct EditParagraphHandler {
    paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
}

impl EditParagraphHandler {
    pub fn new(paragraph_repo: Arc<dyn ParagraphRepositoryPort>) -> Self {
        Self { paragraph_repo }
    }

    pub async fn handle(&self, command: EditParagraph) -> Result<ParagraphRecord, ApplicationError> {
        let content = Content::new(command.content)?;

        let paragraph = self
            .paragraph_repo
            .update_content(command.paragraph_id, content.as_str())
            .await?
            .ok_or_else(|| ApplicationError::not_found("Paragraph", command.paragraph_id))?;

        tracing::info!(
            paragraph_id = %paragraph.id,
            chapter_id = %paragraph.chapter_id,
            user_id = %command.actor.user_id,
            "Paragraph edited"
        );

        Ok(paragraph)
    }
}

// ============================================================================
// DeleteParagraph
// ============================================================================

/// 删除段落响应
#[derive(Debug, Clone)]
pub struct DeleteParagraphResponse {
    pub paragraph_id: ParagraphId,
    pub chapter_id: ChapterId,
    pub comments_removed: usize,
}

/// DeleteParagraph Handler - 评论与段落在同一事务中删除
///
/// 删除后章节内的 order 可能出现空洞，不做重新编号。
pub struct DeleteParagraphHandler {
    paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
}

impl DeleteParagraphHandler {
    pub fn new(paragraph_repo: Arc<dyn ParagraphRepositoryPort>) -> Self {
        Self { paragraph_repo }
    }

    pub async fn handle(
        &self,
        command: DeleteParagraph,
    ) -> Result<DeleteParagraphResponse, ApplicationError> {
        let deleted = self
            .paragraph_repo
            .delete_cascade(command.paragraph_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Paragraph", command.paragraph_id))?;

        tracing::info!(
            paragraph_id = %deleted.paragraph.id,
            chapter_id = %deleted.paragraph.chapter_id,
            comments_removed = deleted.comments_removed,
            user_id = %command.actor.user_id,
            "Paragraph deleted"
        );

        Ok(DeleteParagraphResponse {
            paragraph_id: deleted.paragraph.id,
            chapter_id: deleted.paragraph.chapter_id,
            comments_removed: deleted.comments_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::identity::Actor;
    use crate::application::ports::CommentRepositoryPort;
    use crate::infrastructure::persistence::sqlite::testing::{
        add_comment, chapter_with_paragraphs, memory_pool,
    };
    use crate::infrastructure::persistence::sqlite::{
        DbPool, SqliteChapterRepository, SqliteCommentRepository, SqliteParagraphRepository,
    };

    fn create_handler(pool: &DbPool) -> CreateParagraphHandler {
        CreateParagraphHandler::new(
            Arc::new(SqliteChapterRepository::new(pool.clone())),
            Arc::new(SqliteParagraphRepository::new(pool.clone())),
        )
    }

    #[tokio::test]
    async fn test_create_appends_to_chapter() {
        let pool = memory_pool().await;
        let (chapter_id, _) = chapter_with_paragraphs(&pool, "I", &["a", "b"]).await;

        let created = create_handler(&pool)
            .handle(CreateParagraph {
                actor: Actor::new("u1"),
                chapter_id,
                content: "En un lugar de la Mancha".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.order, 2);
        assert_eq!(created.content, "En un lugar de la Mancha");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let pool = memory_pool().await;
        let (chapter_id, _) = chapter_with_paragraphs(&pool, "I", &[]).await;

        let err = create_handler(&pool)
            .handle(CreateParagraph {
                actor: Actor::new("u1"),
                chapter_id,
                content: "   \n".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        let remaining = SqliteParagraphRepository::new(pool)
            .list_ordered(chapter_id)
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn test_create_in_missing_chapter_is_not_found() {
        let pool = memory_pool().await;

        let err = create_handler(&pool)
            .handle(CreateParagraph {
                actor: Actor::new("u1"),
                chapter_id: ChapterId::new(9),
                content: "texto".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::NotFound {
                resource_type: "Chapter",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_edit_replaces_content_only() {
        let pool = memory_pool().await;
        let (_, p) = chapter_with_paragraphs(&pool, "I", &["a", "b"]).await;
        let handler = EditParagraphHandler::new(Arc::new(SqliteParagraphRepository::new(pool)));

        let edited = handler
            .handle(EditParagraph {
                actor: Actor::new("u1"),
                paragraph_id: p[1],
                content: "b revisado".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(edited.content, "b revisado");
        assert_eq!(edited.order, 1);

        let err = handler
            .handle(EditParagraph {
                actor: Actor::new("u1"),
                paragraph_id: ParagraphId::new(999),
                content: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_comments_and_leaves_gap() {
        let pool = memory_pool().await;
        let (chapter_id, p) = chapter_with_paragraphs(&pool, "I", &["a", "b", "c"]).await;
        add_comment(&pool, p[1], "u1", "uno").await;
        add_comment(&pool, p[1], "u2", "dos").await;

        let handler =
            DeleteParagraphHandler::new(Arc::new(SqliteParagraphRepository::new(pool.clone())));
        let response = handler
            .handle(DeleteParagraph {
                actor: Actor::new("u1"),
                paragraph_id: p[1],
            })
            .await
            .unwrap();

        assert_eq!(response.chapter_id, chapter_id);
        assert_eq!(response.comments_removed, 2);

        let remaining = SqliteParagraphRepository::new(pool.clone())
            .list_ordered(chapter_id)
            .await
            .unwrap();
        let orders: Vec<i64> = remaining.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![0, 2]);

        let comments = SqliteCommentRepository::new(pool)
            .find_by_paragraph(p[1])
            .await
            .unwrap();
        assert!(comments.is_empty());

        let err = handler
            .handle(DeleteParagraph {
                actor: Actor::new("u1"),
                paragraph_id: p[1],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
