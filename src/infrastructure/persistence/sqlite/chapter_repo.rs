//! SQLite Chapter Repository
//!
//! 聚合读取在一个读事务中完成，WAL 模式下事务内看到的是同一个快照，
//! 不会读到交换进行到一半的顺序值。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use super::database::map_db_error;
use super::rows::{AuthoredCommentRow, ChapterRow, ParagraphRow};
use super::DbPool;
use crate::application::ports::{
    AuthoredCommentRecord, ChapterRecord, ChapterRepositoryPort, ChapterSnapshot,
    ImportedCatalog, NewChapter, ParagraphRecord, RepositoryError,
};
use crate::domain::book::ChapterId;

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn save(&self, title: &str) -> Result<ChapterRecord, RepositoryError> {
        let row: ChapterRow = sqlx::query_as(
            "INSERT INTO chapters (title, created_at) VALUES (?, ?) RETURNING id, title, created_at",
        )
        .bind(title)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        ChapterRecord::try_from(row)
    }

    async fn find_by_id(&self, id: ChapterId) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> =
            sqlx::query_as("SELECT id, title, created_at FROM chapters WHERE id = ?")
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn import_catalog(
        &self,
        chapters: &[NewChapter],
    ) -> Result<ImportedCatalog, RepositoryError> {
        // 未提交的事务在 drop 时自动回滚
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let now = Utc::now().to_rfc3339();

        let mut imported = ImportedCatalog {
            chapters: Vec::with_capacity(chapters.len()),
            paragraphs_created: 0,
        };

        for chapter in chapters {
            let row: ChapterRow = sqlx::query_as(
                "INSERT INTO chapters (title, created_at) VALUES (?, ?) RETURNING id, title, created_at",
            )
            .bind(&chapter.title)
            .bind(&now)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            for (order, content) in chapter.paragraphs.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO paragraphs (chapter_id, content, sort_order, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(row.id)
                .bind(content)
                .bind(order as i64)
                .bind(&now)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }

            imported.paragraphs_created += chapter.paragraphs.len();
            imported.chapters.push(ChapterRecord::try_from(row)?);
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(imported)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count as usize)
    }

    async fn load_snapshot(
        &self,
        id: ChapterId,
    ) -> Result<Option<ChapterSnapshot>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let chapter: Option<ChapterRow> =
            sqlx::query_as("SELECT id, title, created_at FROM chapters WHERE id = ?")
                .bind(id.value())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;

        let Some(chapter) = chapter else {
            return Ok(None);
        };

        let paragraphs: Vec<ParagraphRow> = sqlx::query_as(
            "SELECT id, chapter_id, content, sort_order, created_at, updated_at FROM paragraphs WHERE chapter_id = ? ORDER BY sort_order ASC",
        )
        .bind(id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let comments: Vec<AuthoredCommentRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.paragraph_id, p.chapter_id, c.user_id, c.content, c.created_at,
                   u.name AS user_name, u.image AS user_image
            FROM comments c
            JOIN paragraphs p ON p.id = c.paragraph_id
            JOIN users u ON u.id = c.user_id
            WHERE p.chapter_id = ?
            ORDER BY c.id ASC
            "#,
        )
        .bind(id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Some(ChapterSnapshot {
            chapter: ChapterRecord::try_from(chapter)?,
            paragraphs: paragraphs
                .into_iter()
                .map(ParagraphRecord::try_from)
                .collect::<Result<_, _>>()?,
            comments: comments
                .into_iter()
                .map(AuthoredCommentRecord::try_from)
                .collect::<Result<_, _>>()?,
        }))
    }

    async fn load_all_snapshots(&self) -> Result<Vec<ChapterSnapshot>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let chapters: Vec<ChapterRow> =
            sqlx::query_as("SELECT id, title, created_at FROM chapters ORDER BY id ASC")
                .fetch_all(&mut *tx)
                .await
                .map_err(map_db_error)?;

        let paragraphs: Vec<ParagraphRow> = sqlx::query_as(
            "SELECT id, chapter_id, content, sort_order, created_at, updated_at FROM paragraphs ORDER BY chapter_id ASC, sort_order ASC",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let comments: Vec<AuthoredCommentRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.paragraph_id, p.chapter_id, c.user_id, c.content, c.created_at,
                   u.name AS user_name, u.image AS user_image
            FROM comments c
            JOIN paragraphs p ON p.id = c.paragraph_id
            JOIN users u ON u.id = c.user_id
            ORDER BY c.id ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        let mut snapshots = Vec::with_capacity(chapters.len());
        let mut positions: HashMap<i64, usize> = HashMap::with_capacity(chapters.len());

        for (position, row) in chapters.into_iter().enumerate() {
            positions.insert(row.id, position);
            snapshots.push(ChapterSnapshot {
                chapter: ChapterRecord::try_from(row)?,
                paragraphs: Vec::new(),
                comments: Vec::new(),
            });
        }

        for row in paragraphs {
            let position = positions.get(&row.chapter_id).copied().ok_or_else(|| {
                RepositoryError::NotFound(format!("chapter {} of paragraph {}", row.chapter_id, row.id))
            })?;
            snapshots[position].paragraphs.push(ParagraphRecord::try_from(row)?);
        }

        for row in comments {
            let position = positions.get(&row.chapter_id).copied().ok_or_else(|| {
                RepositoryError::NotFound(format!("chapter {} of comment {}", row.chapter_id, row.id))
            })?;
            snapshots[position]
                .comments
                .push(AuthoredCommentRecord::try_from(row)?);
        }

        Ok(snapshots)
    }
}
