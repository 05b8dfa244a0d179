//! SQLite Comment Repository

use async_trait::async_trait;
use chrono::Utc;

use super::database::map_db_error;
use super::rows::CommentRow;
use super::DbPool;
use crate::application::ports::{
    CommentRecord, CommentRepositoryPort, NewComment, RepositoryError,
};
use crate::domain::book::ParagraphId;

/// SQLite Comment Repository
pub struct SqliteCommentRepository {
    pool: DbPool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepositoryPort for SqliteCommentRepository {
    async fn save(&self, comment: &NewComment) -> Result<CommentRecord, RepositoryError> {
        let row: CommentRow = sqlx::query_as(
            r#"
            INSERT INTO comments (paragraph_id, user_id, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, paragraph_id, user_id, content, created_at
            "#,
        )
        .bind(comment.paragraph_id.value())
        .bind(&comment.user_id)
        .bind(&comment.content)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        CommentRecord::try_from(row)
    }

    async fn find_by_paragraph(
        &self,
        paragraph_id: ParagraphId,
    ) -> Result<Vec<CommentRecord>, RepositoryError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT id, paragraph_id, user_id, content, created_at FROM comments WHERE paragraph_id = ? ORDER BY id ASC",
        )
        .bind(paragraph_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(CommentRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{UserRecord, UserRepositoryPort};
    use crate::infrastructure::persistence::sqlite::testing::{
        chapter_with_paragraphs, memory_pool,
    };
    use crate::infrastructure::persistence::sqlite::SqliteUserRepository;

    #[tokio::test]
    async fn test_save_and_list_in_insertion_order() {
        let pool = memory_pool().await;
        let (_, p) = chapter_with_paragraphs(&pool, "I", &["a"]).await;
        SqliteUserRepository::new(pool.clone())
            .upsert(&UserRecord {
                id: "u1".to_string(),
                name: Some("Dulcinea".to_string()),
                image: None,
            })
            .await
            .unwrap();

        let repo = SqliteCommentRepository::new(pool);
        for text in ["uno", "dos", "tres"] {
            repo.save(&NewComment {
                paragraph_id: p[0],
                user_id: "u1".to_string(),
                content: text.to_string(),
            })
            .await
            .unwrap();
        }

        let comments = repo.find_by_paragraph(p[0]).await.unwrap();
        let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["uno", "dos", "tres"]);
    }

    #[tokio::test]
    async fn test_comment_on_missing_paragraph_is_not_found() {
        let pool = memory_pool().await;
        SqliteUserRepository::new(pool.clone())
            .upsert(&UserRecord {
                id: "u1".to_string(),
                name: None,
                image: None,
            })
            .await
            .unwrap();

        let repo = SqliteCommentRepository::new(pool);
        let err = repo
            .save(&NewComment {
                paragraph_id: ParagraphId::new(12345),
                user_id: "u1".to_string(),
                content: "perdido".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
