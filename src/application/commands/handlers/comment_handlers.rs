//! Comment Command Handlers

use std::sync::Arc;

use crate::application::commands::AddComment;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CommentRepositoryPort, NewComment, ParagraphRepositoryPort, RepositoryError,
    UserRepositoryPort,
};
use crate::domain::book::{ChapterId, Comment, Content};

/// 发表评论响应
#[derive(Debug, Clone)]
pub struct AddCommentResponse {
    pub chapter_id: ChapterId,
    pub comment: Comment,
}

/// AddComment Handler - 刷新作者资料后写入评论
pub struct AddCommentHandler {
    paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
    comment_repo: Arc<dyn CommentRepositoryPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl AddCommentHandler {
    pub fn new(
        paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
    ) -> Self {
        Self {
            paragraph_repo,
            comment_repo,
            user_repo,
        }
    }

    pub async fn handle(&self, command: AddComment) -> Result<AddCommentResponse, ApplicationError> {
        let content = Content::new(command.content)?;

        let paragraph = self
            .paragraph_repo
            .find_by_id(command.paragraph_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Paragraph", command.paragraph_id))?;

        let author = command.actor.to_user_record();
        self.user_repo.upsert(&author).await?;

        let record = self
            .comment_repo
            .save(&NewComment {
                paragraph_id: paragraph.id,
                user_id: author.id.clone(),
                content: content.into_inner(),
            })
            .await
            .map_err(|e| match e {
                // 段落在检查之后被删除
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("Paragraph", command.paragraph_id)
                }
                other => other.into(),
            })?;

        tracing::info!(
            comment_id = %record.id,
            paragraph_id = %record.paragraph_id,
            chapter_id = %paragraph.chapter_id,
            user_id = %record.user_id,
            "Comment added"
        );

        let comment = Comment::new(
            record.id,
            record.paragraph_id,
            record.content,
            author.into_author(),
            record.created_at,
        );

        Ok(AddCommentResponse {
            chapter_id: paragraph.chapter_id,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::identity::Actor;
    use crate::domain::book::ParagraphId;
    use crate::infrastructure::persistence::sqlite::testing::{
        chapter_with_paragraphs, memory_pool,
    };
    use crate::infrastructure::persistence::sqlite::{
        DbPool, SqliteCommentRepository, SqliteParagraphRepository, SqliteUserRepository,
    };

    fn handler(pool: &DbPool) -> AddCommentHandler {
        AddCommentHandler::new(
            Arc::new(SqliteParagraphRepository::new(pool.clone())),
            Arc::new(SqliteCommentRepository::new(pool.clone())),
            Arc::new(SqliteUserRepository::new(pool.clone())),
        )
    }

    #[tokio::test]
    async fn test_add_comment_records_author() {
        let pool = memory_pool().await;
        let (chapter_id, p) = chapter_with_paragraphs(&pool, "I", &["a"]).await;

        let actor = Actor::new("u7").with_profile(
            Some("Rocinante".to_string()),
            Some("https://example.org/r.png".to_string()),
        );
        let response = handler(&pool)
            .handle(AddComment {
                actor,
                paragraph_id: p[0],
                content: "¡Qué párrafo!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.chapter_id, chapter_id);
        assert_eq!(response.comment.content(), "¡Qué párrafo!");
        assert_eq!(response.comment.author().name(), Some("Rocinante"));

        let stored = SqliteUserRepository::new(pool)
            .find_by_id("u7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.image.as_deref(), Some("https://example.org/r.png"));
    }

    #[tokio::test]
    async fn test_add_comment_validates_input() {
        let pool = memory_pool().await;
        let (_, p) = chapter_with_paragraphs(&pool, "I", &["a"]).await;
        let handler = handler(&pool);

        let blank = handler
            .handle(AddComment {
                actor: Actor::new("u1"),
                paragraph_id: p[0],
                content: " ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(blank, ApplicationError::ValidationError(_)));

        let missing = handler
            .handle(AddComment {
                actor: Actor::new("u1"),
                paragraph_id: ParagraphId::new(500),
                content: "hola".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(missing, ApplicationError::NotFound { .. }));
    }
}
